//! Course catalog entries and the compiled-in seed catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identifier of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(i32);

impl CourseId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for CourseId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// A listed course. Immutable once published.
///
/// `level` is an open string; "Beginner", "Intermediate" and "Advanced" are
/// the conventional values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub duration: String,
    pub level: String,
    pub image: String,
}

struct SeedRow {
    id: i32,
    title: &'static str,
    description: &'static str,
    instructor: &'static str,
    duration: &'static str,
    level: &'static str,
    image: &'static str,
}

const SEED_ROWS: [SeedRow; 6] = [
    SeedRow {
        id: 1,
        title: "Introduction to Web Development",
        description: "Learn the basics of HTML, CSS, and JavaScript to build responsive websites.",
        instructor: "Sarah Johnson",
        duration: "8 weeks",
        level: "Beginner",
        image: "https://images.unsplash.com/photo-1517180102446-f3ece451e9d8?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80",
    },
    SeedRow {
        id: 2,
        title: "Advanced React Patterns",
        description: "Master advanced React concepts like hooks, context, and custom hooks.",
        instructor: "Michael Chen",
        duration: "6 weeks",
        level: "Advanced",
        image: "https://images.unsplash.com/photo-1587620962725-abab7fe55159?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80",
    },
    SeedRow {
        id: 3,
        title: "Data Science Fundamentals",
        description: "Introduction to data analysis, visualization, and basic machine learning concepts.",
        instructor: "Alex Rodriguez",
        duration: "10 weeks",
        level: "Intermediate",
        image: "https://images.unsplash.com/photo-1504868584819-f8e8b4b6d7e3?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80",
    },
    SeedRow {
        id: 4,
        title: "UX/UI Design Principles",
        description: "Learn the core principles of user experience and interface design.",
        instructor: "Emma Watson",
        duration: "5 weeks",
        level: "Beginner",
        image: "https://images.unsplash.com/photo-1531403009284-440f080d1e12?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80",
    },
    SeedRow {
        id: 5,
        title: "Mobile App Development with React Native",
        description: "Build cross-platform mobile applications using React Native.",
        instructor: "David Kim",
        duration: "8 weeks",
        level: "Intermediate",
        image: "https://images.unsplash.com/photo-1551650975-87deedd944c3?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80",
    },
    SeedRow {
        id: 6,
        title: "Cloud Computing with AWS",
        description: "Master cloud infrastructure and services using Amazon Web Services.",
        instructor: "Priya Patel",
        duration: "7 weeks",
        level: "Advanced",
        image: "https://images.unsplash.com/photo-1535378620166-273708d44e4c?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80",
    },
];

/// The six seed courses in listing order.
///
/// # Examples
/// ```
/// use learnhub::domain::seed_courses;
///
/// let courses = seed_courses();
/// assert_eq!(courses.len(), 6);
/// assert_eq!(courses[1].title, "Advanced React Patterns");
/// ```
pub fn seed_courses() -> Vec<Course> {
    SEED_ROWS
        .iter()
        .map(|row| Course {
            id: CourseId::new(row.id),
            title: row.title.to_owned(),
            description: row.description.to_owned(),
            instructor: row.instructor.to_owned(),
            duration: row.duration.to_owned(),
            level: row.level.to_owned(),
            image: row.image.to_owned(),
        })
        .collect()
}
