//! Course model and field extraction
//!
//! A course detail page is parsed once into a [`CoursePage`], whose
//! accessors each look up one landmark element independently. A [`Course`]
//! snapshots those five values together with the source URL.

mod extractor;

pub use extractor::CoursePage;

/// Placeholder written when a field cannot be extracted
pub const DEFAULT_VALUE: &str = "-";

/// One course row, built once per sitemap URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub url: String,
    pub name: String,
    pub language: String,
    pub duration: String,
    pub rating: String,
    pub start_date: String,
}

impl Course {
    /// Extracts every field from a parsed course page
    pub fn from_page(url: impl Into<String>, page: &CoursePage) -> Self {
        Self {
            url: url.into(),
            name: page.course_name(),
            language: page.language(),
            duration: page.duration(),
            rating: page.rating(),
            start_date: page.start_date(),
        }
    }

    /// Cells in spreadsheet column order: Name, Start Date, Languages,
    /// Duration, Rating, Url
    pub fn row(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.start_date.as_str(),
            self.language.as_str(),
            self.duration.as_str(),
            self.rating.as_str(),
            self.url.as_str(),
        ]
    }
}
