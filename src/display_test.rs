use super::*;

fn painted(display: &TerminalDisplay<Vec<u8>>) -> String {
    String::from_utf8_lossy(display.writer()).into_owned()
}

#[test]
fn element_ids_match_dashboard_markup() {
    assert_eq!(Element::MainCard.id(), "main-card");
    assert_eq!(Element::CurrTemp.id(), "curr-temp");
    assert_eq!(Element::CtaText.id(), "cta-text");
    assert_eq!(Element::DecisionLabel.id(), "decision-label");
    assert_eq!(Element::Outlook.id(), "outlook");
}

#[test]
fn set_class_adds_and_removes() {
    let mut display = TerminalDisplay::new(Vec::new(), false);
    display.set_class(Element::MainCard, TRANSITIONING_CLASS, true);
    assert!(display.has_class(Element::MainCard, TRANSITIONING_CLASS));
    display.set_class(Element::MainCard, TRANSITIONING_CLASS, false);
    assert!(!display.has_class(Element::MainCard, TRANSITIONING_CLASS));
}

#[test]
fn removing_absent_class_is_noop() {
    let mut display = TerminalDisplay::new(Vec::new(), false);
    display.set_class(Element::CurrTemp, "hot", false);
    assert!(!display.has_class(Element::CurrTemp, "hot"));
}

#[test]
fn flush_before_any_reading_shows_waiting() {
    let mut display = TerminalDisplay::new(Vec::new(), false);
    display.flush().unwrap();
    assert!(painted(&display).contains("waiting for first reading"));
}

#[test]
fn flush_paints_rendered_text() {
    let mut display = TerminalDisplay::new(Vec::new(), false);
    display.set_text(Element::CurrTemp, "31.5°C");
    display.set_text(Element::CtaText, "The heat is starting to break.");
    display.set_text(Element::DecisionLabel, "GREEN_ON:RECOVERY_MODE");
    display.set_text(Element::Outlook, "humidity 65% · 60m 30.4°C");
    display.set_class(Element::MainCard, "led-green", true);
    display.flush().unwrap();

    let out = painted(&display);
    assert!(out.contains("31.5°C"));
    assert!(out.contains("The heat is starting to break."));
    assert!(out.contains("GREEN_ON:RECOVERY_MODE"));
    assert!(out.contains("humidity 65%"));
    assert!(!out.contains("decision changing"));
}

#[test]
fn flush_shows_transition_banner() {
    let mut display = TerminalDisplay::new(Vec::new(), false);
    display.set_text(Element::CurrTemp, "29°C");
    display.set_class(Element::MainCard, TRANSITIONING_CLASS, true);
    display.flush().unwrap();
    assert!(painted(&display).contains("decision changing"));
}

#[test]
fn text_reflects_last_write() {
    let mut display = TerminalDisplay::new(Vec::new(), false);
    display.set_text(Element::CtaText, "first");
    display.set_text(Element::CtaText, "second");
    assert_eq!(display.text(Element::CtaText), Some("second"));
    assert_eq!(display.text(Element::CurrTemp), None);
}
