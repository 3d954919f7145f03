/* 📖 # Why keep a binary search tree next to the catalog?

CourseIndex is an ordered index from course ID to its own copy of the course record.
It is deliberately independent of CourseCatalog: the catalog stays the authoritative,
insertion-ordered list that the HTTP routes read, and nothing synchronizes the two.

The tree is unbalanced. Inserting IDs in sorted order produces a linked-list shaped
tree, so insert, search and drop are all written as loops rather than recursion.
*/

use std::cmp::Ordering;

use crate::course::{Course, CourseId};

#[derive(Debug)]
struct IndexNode {
    course: Course,
    left: Option<Box<IndexNode>>,
    right: Option<Box<IndexNode>>,
}

impl IndexNode {
    fn new(course: Course) -> Self {
        Self {
            course,
            left: None,
            right: None,
        }
    }
}

/// Binary search tree of courses keyed by [`CourseId`].
///
/// Smaller IDs go left; equal or greater IDs go right. Duplicate IDs are accepted and
/// stored to the right of the existing entry, so [`search`](CourseIndex::search) returns
/// the copy that was inserted first.
#[derive(Debug, Default)]
pub struct CourseIndex {
    root: Option<Box<IndexNode>>,
    len: usize,
}

impl CourseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by inserting the courses in iteration order.
    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        let mut index = Self::new();
        for course in courses {
            index.insert(course);
        }
        index
    }

    /// Add a course as a new leaf. Never replaces an existing entry.
    pub fn insert(&mut self, course: Course) {
        let id = course.id();
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if id < node.course.id() {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Box::new(IndexNode::new(course)));
        self.len += 1;
    }

    /// Find the first course on the search path whose ID equals `id`.
    pub fn search(&self, id: CourseId) -> Option<&Course> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match id.cmp(&node.course.id()) {
                Ordering::Equal => return Some(&node.course),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Number of inserted courses, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path (0 for an empty index).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&IndexNode, usize)> =
            self.root.as_deref().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.left.as_deref().map(|left| (left, level + 1)));
            pending.extend(node.right.as_deref().map(|right| (right, level + 1)));
        }
        deepest
    }
}

impl Drop for CourseIndex {
    fn drop(&mut self) {
        // Detach children before each node drops so a degenerate tree does not
        // recurse once per level.
        let mut pending: Vec<Box<IndexNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: u64, name: &str) -> Course {
        Course::new(CourseId::new(id), name, 10, 100)
    }

    #[test]
    fn test_search_empty_index() {
        let index = CourseIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.depth(), 0);
        assert!(index.search(CourseId::new(1)).is_none());
    }

    #[test]
    fn test_insert_then_search_finds_every_id() {
        let ids = [50, 30, 70, 20, 40, 60, 80, 35, 65, 10];
        let index = CourseIndex::from_courses(ids.iter().map(|&id| course(id, "course")));

        assert_eq!(index.len(), ids.len());
        for id in ids {
            let found = index.search(CourseId::new(id)).unwrap();
            assert_eq!(found.id(), CourseId::new(id));
        }
    }

    #[test]
    fn test_search_missing_id() {
        let index = CourseIndex::from_courses([course(5, "a"), course(3, "b"), course(8, "c")]);
        assert!(index.search(CourseId::new(4)).is_none());
        assert!(index.search(CourseId::new(9)).is_none());
        assert!(index.search(CourseId::new(1)).is_none());
    }

    #[test]
    fn test_duplicate_id_returns_first_inserted() {
        let index = CourseIndex::from_courses([
            course(5, "five"),
            course(3, "first three"),
            course(8, "eight"),
            course(3, "second three"),
        ]);

        assert_eq!(index.len(), 4);
        assert_eq!(index.search(CourseId::new(3)).unwrap().name(), "first three");
        // the duplicate hangs to the right of the first 3: 5 -> 3 -> 3
        assert_eq!(index.depth(), 3);
    }

    #[test]
    fn test_duplicate_of_root_goes_right() {
        let index = CourseIndex::from_courses([course(7, "root"), course(7, "shadow")]);
        assert_eq!(index.search(CourseId::new(7)).unwrap().name(), "root");
        assert_eq!(index.depth(), 2);
    }

    #[test]
    fn test_balanced_insertion_order_depth() {
        let index = CourseIndex::from_courses(
            [4, 2, 6, 1, 3, 5, 7].iter().map(|&id| course(id, "course")),
        );
        assert_eq!(index.depth(), 3);
    }

    #[test]
    fn test_sorted_insertion_degenerates_without_overflow() {
        let count = 10_000;
        let index = CourseIndex::from_courses((1..=count).map(|id| course(id, "course")));

        assert_eq!(index.depth(), count as usize);
        assert_eq!(index.search(CourseId::new(count)).unwrap().id(), CourseId::new(count));
        assert!(index.search(CourseId::new(count + 1)).is_none());
        drop(index);
    }
}
