//! HTML field extraction for course detail pages
//!
//! Every accessor searches for its own landmark element and falls back to
//! [`DEFAULT_VALUE`] only when the landmark is missing; a present but empty
//! landmark yields an empty string. Accessors never fail and
//! never depend on each other, so one missing landmark only affects its own
//! field.

use crate::course::DEFAULT_VALUE;
use scraper::{ElementRef, Html, Selector};

const NAME_SELECTOR: &str = "h1.title.display-3-text";
const LANGUAGE_SELECTOR: &str = "div.language-info";
const RATING_SELECTOR: &str = "div.ratings-text.bt3-visible-xs";
const START_DATE_SELECTOR: &str = "div.startdate.rc-StartDateString.caption-text";

/// Elements that can carry the duration label
const LABEL_SELECTOR: &str = "span, label";

/// Label text that introduces the duration value
const COMMITMENT_LABEL: &str = "Commitment";

/// Leading words removed from the start date
const START_DATE_PREFIXES: [&str; 2] = ["Started ", "Starts "];

/// A parsed course detail page
pub struct CoursePage {
    document: Html,
}

impl CoursePage {
    /// Parses HTML content into a queryable page
    ///
    /// Parsing is lenient; malformed markup still produces a page whose
    /// accessors return the default value.
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Text of the course title heading
    pub fn course_name(&self) -> String {
        self.first_text(NAME_SELECTOR).unwrap_or_else(default_value)
    }

    /// Text of the language information block
    pub fn language(&self) -> String {
        self.first_text(LANGUAGE_SELECTOR)
            .unwrap_or_else(default_value)
    }

    /// Text of the value associated with the "Commitment" label
    ///
    /// The value is looked up through an explicit label association first
    /// (`aria-labelledby` or `<label for>`). Pages without one fall back to
    /// the element following the label's parent, which breaks if the
    /// surrounding markup is restructured.
    pub fn duration(&self) -> String {
        self.commitment_label()
            .and_then(|label| {
                self.labelled_value(label)
                    .or_else(|| following_parent_sibling(label))
            })
            .map(element_text)
            .unwrap_or_else(default_value)
    }

    /// Text of the ratings block
    pub fn rating(&self) -> String {
        self.first_text(RATING_SELECTOR).unwrap_or_else(default_value)
    }

    /// Start date with its leading "Starts " / "Started " removed
    pub fn start_date(&self) -> String {
        self.first_text(START_DATE_SELECTOR)
            .map(|text| strip_start_prefix(&text).to_string())
            .unwrap_or_else(default_value)
    }

    /// Trimmed text of the first element matching `selector`, possibly empty
    fn first_text(&self, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;

        self.document
            .select(&selector)
            .next()
            .map(element_text)
    }

    /// First `span` or `label` whose text is exactly the commitment label
    ///
    /// Formatting elements inside the label are not labels themselves.
    fn commitment_label(&self) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(LABEL_SELECTOR).ok()?;

        self.document
            .select(&selector)
            .find(|element| element_text(*element) == COMMITMENT_LABEL)
    }

    /// Element explicitly associated with the label, if any
    fn labelled_value(&self, label: ElementRef<'_>) -> Option<ElementRef<'_>> {
        if let Some(id) = label.value().id() {
            let selector = Selector::parse("[aria-labelledby]").ok()?;
            let described = self.document.select(&selector).find(|element| {
                element
                    .value()
                    .attr("aria-labelledby")
                    .map(|ids| ids.split_whitespace().any(|candidate| candidate == id))
                    .unwrap_or(false)
            });
            if described.is_some() {
                return described;
            }
        }

        let target = label.value().attr("for")?;
        let selector = Selector::parse("[id]").ok()?;
        self.document
            .select(&selector)
            .find(|element| element.value().id() == Some(target))
    }
}

/// First element sibling after the label's parent
fn following_parent_sibling(label: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let parent = label.parent()?;
    parent.next_siblings().find_map(ElementRef::wrap)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn strip_start_prefix(text: &str) -> &str {
    START_DATE_PREFIXES
        .iter()
        .find_map(|prefix| text.strip_prefix(*prefix))
        .unwrap_or(text)
        .trim()
}

fn default_value() -> String {
    DEFAULT_VALUE.to_string()
}
