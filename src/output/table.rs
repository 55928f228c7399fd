use crate::course::Course;

/// Name of the single worksheet
pub const SHEET_NAME: &str = "Courses";

/// Column titles, in column order
pub const HEADER: [&str; 6] = ["Name", "Start Date", "Languages", "Duration", "Rating", "Url"];

/// In-memory course table, rows kept in the order courses were fetched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseTable {
    rows: Vec<[String; 6]>,
}

impl CourseTable {
    /// Creates an empty table; the header is implicit
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one row built from the course fields and its URL
    pub fn push(&mut self, course: &Course) {
        self.rows.push(course.row().map(str::to_string));
    }

    pub fn header(&self) -> &[&'static str; 6] {
        &HEADER
    }

    /// Data rows, excluding the header
    pub fn rows(&self) -> &[[String; 6]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
