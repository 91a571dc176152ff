//! Display surface — element ids, the `DisplaySurface` trait, and the
//! terminal implementation.
//!
//! DESIGN
//! ======
//! The dashboard is modelled as a handful of named elements that carry a
//! text value and a set of classes, like a tiny DOM. The poller only ever
//! mutates elements; the surface decides how that looks. `TerminalDisplay`
//! keeps the element state in memory and repaints the whole card on
//! `flush`, mapping classes to colors with crossterm.

use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

/// Class put on the card while a decision change is pending.
pub const TRANSITIONING_CLASS: &str = "transitioning";

// =============================================================================
// ELEMENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    MainCard,
    CurrTemp,
    CtaText,
    DecisionLabel,
    Outlook,
}

impl Element {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::MainCard => "main-card",
            Self::CurrTemp => "curr-temp",
            Self::CtaText => "cta-text",
            Self::DecisionLabel => "decision-label",
            Self::Outlook => "outlook",
        }
    }
}

// =============================================================================
// SURFACE TRAIT
// =============================================================================

pub trait DisplaySurface {
    fn set_text(&mut self, element: Element, text: &str);

    /// Add (`enabled`) or remove a class on an element.
    fn set_class(&mut self, element: Element, class: &str, enabled: bool);

    /// Make pending mutations visible.
    fn flush(&mut self) -> io::Result<()>;
}

// =============================================================================
// TERMINAL
// =============================================================================

pub struct TerminalDisplay<W: Write> {
    out: W,
    clear_screen: bool,
    texts: HashMap<Element, String>,
    classes: HashMap<Element, BTreeSet<String>>,
}

impl TerminalDisplay<io::Stdout> {
    #[must_use]
    pub fn stdout(clear_screen: bool) -> Self {
        Self::new(io::stdout(), clear_screen)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen, texts: HashMap::new(), classes: HashMap::new() }
    }

    #[must_use]
    pub fn text(&self, element: Element) -> Option<&str> {
        self.texts.get(&element).map(String::as_str)
    }

    #[must_use]
    pub fn has_class(&self, element: Element, class: &str) -> bool {
        self.classes
            .get(&element)
            .is_some_and(|set| set.contains(class))
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn card_color(&self) -> Color {
        if self.has_class(Element::MainCard, TRANSITIONING_CLASS) {
            return Color::Yellow;
        }
        if self.has_class(Element::MainCard, "led-green") {
            Color::Green
        } else if self.has_class(Element::MainCard, "led-yellow") {
            Color::Yellow
        } else if self.has_class(Element::MainCard, "led-red") {
            Color::Red
        } else {
            Color::Reset
        }
    }

    fn temperature_color(&self) -> Color {
        if self.has_class(Element::CurrTemp, "hot") { Color::Red } else { Color::Cyan }
    }

    fn paint(&mut self) -> io::Result<()> {
        if self.clear_screen {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }

        let card = self.card_color();
        queue!(self.out, SetForegroundColor(card), Print("== Proactive Climate ==\n"), ResetColor)?;

        if self.has_class(Element::MainCard, TRANSITIONING_CLASS) {
            queue!(
                self.out,
                SetForegroundColor(Color::Yellow),
                SetAttribute(Attribute::SlowBlink),
                Print("!! decision changing\n"),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }

        let Some(temperature) = self.texts.get(&Element::CurrTemp).cloned() else {
            queue!(self.out, Print("waiting for first reading...\n"))?;
            return self.out.flush();
        };

        let temp_color = self.temperature_color();
        let decision = self.text(Element::DecisionLabel).unwrap_or("").to_owned();
        let notes = self.text(Element::CtaText).unwrap_or("").to_owned();
        let outlook = self.text(Element::Outlook).unwrap_or("").to_owned();
        queue!(
            self.out,
            Print("Temperature  "),
            SetForegroundColor(temp_color),
            Print(format!("{temperature}\n")),
            ResetColor,
            Print("Decision     "),
            SetForegroundColor(card),
            Print(format!("{decision}\n")),
            ResetColor
        )?;
        if !outlook.is_empty() {
            queue!(
                self.out,
                SetAttribute(Attribute::Dim),
                Print(format!("{outlook}\n")),
                SetAttribute(Attribute::Reset)
            )?;
        }
        queue!(self.out, Print(format!("\n{notes}\n")))?;
        self.out.flush()
    }
}

impl<W: Write> DisplaySurface for TerminalDisplay<W> {
    fn set_text(&mut self, element: Element, text: &str) {
        self.texts.insert(element, text.to_owned());
    }

    fn set_class(&mut self, element: Element, class: &str, enabled: bool) {
        let set = self.classes.entry(element).or_default();
        if enabled {
            set.insert(class.to_owned());
        } else {
            set.remove(class);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.paint()
    }
}

#[cfg(test)]
#[path = "display_test.rs"]
mod tests;
