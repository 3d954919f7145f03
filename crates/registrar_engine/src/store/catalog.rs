use crate::course::{Course, CourseId};

/// The authoritative list of courses, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        Self {
            courses: courses.into_iter().collect(),
        }
    }

    pub fn add(&mut self, course: Course) {
        self.courses.push(course);
    }

    /// All courses in stored order.
    pub fn list_all(&self) -> &[Course] {
        &self.courses
    }

    /// A copy of all courses, most popular first.
    ///
    /// The sort is stable: courses with equal popularity keep their stored order.
    pub fn list_by_popularity_descending(&self) -> Vec<Course> {
        let mut sorted = self.courses.clone();
        sorted.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
        sorted
    }

    /// Linear scan for the first course with the given ID.
    pub fn find_by_id(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id() == id)
    }

    /// Mutable access for the enrollment step, which checks capacity and then
    /// decrements slots through the same reference.
    pub fn find_by_id_mut(&mut self, id: CourseId) -> Option<&mut Course> {
        self.courses.iter_mut().find(|course| course.id() == id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: u64, name: &str, slots: u32, popularity: i64) -> Course {
        Course::new(CourseId::new(id), name, slots, popularity)
    }

    fn names(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(Course::name).collect()
    }

    #[test]
    fn test_list_all_keeps_insertion_order() {
        let mut catalog = CourseCatalog::new();
        catalog.add(course(2, "Physics", 12, 120));
        catalog.add(course(1, "Mathematics", 15, 150));

        assert_eq!(names(catalog.list_all()), vec!["Physics", "Mathematics"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_popularity_sort_is_descending_and_stable() {
        let catalog = CourseCatalog::from_courses([
            course(1, "Mathematics", 15, 150),
            course(2, "Physics", 12, 120),
            course(3, "Computer Science", 25, 200),
            course(4, "Data Science", 20, 200),
        ]);

        let sorted = catalog.list_by_popularity_descending();
        assert_eq!(
            names(&sorted),
            vec!["Computer Science", "Data Science", "Mathematics", "Physics"]
        );
        // the stored order is untouched
        assert_eq!(catalog.list_all()[0].name(), "Mathematics");
    }

    #[test]
    fn test_popularity_sort_repeatable() {
        let catalog = CourseCatalog::from_courses([
            course(1, "A", 1, 10),
            course(2, "B", 1, 10),
            course(3, "C", 1, 10),
        ]);
        assert_eq!(
            catalog.list_by_popularity_descending(),
            catalog.list_by_popularity_descending()
        );
        assert_eq!(names(&catalog.list_by_popularity_descending()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_find_by_id_returns_first_match() {
        let catalog = CourseCatalog::from_courses([
            course(1, "Mathematics", 15, 150),
            course(1, "Shadow Mathematics", 15, 150),
        ]);
        assert_eq!(catalog.find_by_id(CourseId::new(1)).unwrap().name(), "Mathematics");
        assert!(catalog.find_by_id(CourseId::new(999)).is_none());
    }

    #[test]
    fn test_decrement_slots_through_find_by_id_mut() {
        let mut catalog = CourseCatalog::from_courses([course(5, "History", 20, 80)]);

        let remaining = catalog.find_by_id_mut(CourseId::new(5)).unwrap().decrement_slots();
        assert_eq!(remaining, 19);
        assert_eq!(
            catalog.find_by_id(CourseId::new(5)).unwrap().available_slots(),
            19
        );
        assert!(catalog.find_by_id_mut(CourseId::new(6)).is_none());
    }
}
