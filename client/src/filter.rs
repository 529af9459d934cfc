//! Case-insensitive search over the todo list.
//!
//! Filtering never touches the stored list; it is recomputed from the
//! current items and query every time the view renders.

use crate::types::Todo;

/// Items matching `query`, in list order
///
/// A todo matches when its name or its description contains the query,
/// ignoring case. An empty query matches everything.
#[must_use]
pub fn filter_todos<'a>(todos: &'a [Todo], query: &str) -> Vec<&'a Todo> {
    let needle = query.to_lowercase();
    todos.iter().filter(|todo| is_match(todo, &needle)).collect()
}

/// `needle` must already be lowercased
fn is_match(todo: &Todo, needle: &str) -> bool {
    needle.is_empty()
        || todo.name.to_lowercase().contains(needle)
        || todo.description.to_lowercase().contains(needle)
}

/// What the list view shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilteredTodos<'a> {
    /// No item passes the filter, including when the list itself is empty
    NothingToDo,
    /// Matching items in list order; never empty
    Items(Vec<&'a Todo>),
}

impl<'a> FilteredTodos<'a> {
    /// Applies `query` to `todos`
    #[must_use]
    pub fn new(todos: &'a [Todo], query: &str) -> Self {
        let items = filter_todos(todos, query);
        if items.is_empty() {
            Self::NothingToDo
        } else {
            Self::Items(items)
        }
    }

    /// Matching items, empty for [`FilteredTodos::NothingToDo`]
    #[must_use]
    pub fn items(&self) -> &[&'a Todo] {
        match self {
            Self::NothingToDo => &[],
            Self::Items(items) => items,
        }
    }

    /// Whether the empty-view message should be shown
    #[must_use]
    pub const fn is_nothing_to_do(&self) -> bool {
        matches!(self, Self::NothingToDo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoId;
    use proptest::prelude::*;

    fn todo(id: u64, name: &str, description: &str) -> Todo {
        Todo::new(TodoId::new(id), name, description)
    }

    fn names<'a>(items: &[&'a Todo]) -> Vec<&'a str> {
        items.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn matches_name_ignoring_case() {
        let todos = vec![todo(1, "Pizza", "Order"), todo(2, "Salad", "Greens")];
        assert_eq!(names(&filter_todos(&todos, "piz")), vec!["Pizza"]);
        assert_eq!(names(&filter_todos(&todos, "PIZ")), vec!["Pizza"]);
    }

    #[test]
    fn matches_description() {
        let todos = vec![todo(1, "Errand", "buy PIZZA dough"), todo(2, "Salad", "Greens")];
        assert_eq!(names(&filter_todos(&todos, "pizza")), vec!["Errand"]);
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let todos = vec![todo(2, "B", ""), todo(1, "A", "")];
        assert_eq!(names(&filter_todos(&todos, "")), vec!["B", "A"]);
    }

    #[test]
    fn no_match_is_nothing_to_do() {
        let todos = vec![todo(1, "Pizza", "")];
        let view = FilteredTodos::new(&todos, "zzz");
        assert!(view.is_nothing_to_do());
        assert!(view.items().is_empty());
    }

    #[test]
    fn pizza_scenario() {
        let todos = vec![todo(1, "Pizza", ""), todo(2, "Salad", "")];
        let view = FilteredTodos::new(&todos, "piz");
        assert!(!view.is_nothing_to_do());
        assert_eq!(names(view.items()), vec!["Pizza"]);
    }

    #[test]
    fn empty_list_is_nothing_to_do_for_any_query() {
        assert!(FilteredTodos::new(&[], "").is_nothing_to_do());
        assert!(FilteredTodos::new(&[], "piz").is_nothing_to_do());
        assert!(FilteredTodos::new(&[], "piz").items().is_empty());
    }

    fn arb_todo() -> impl Strategy<Value = Todo> {
        (any::<u64>(), "[a-zA-Z ]{0,12}", "[a-zA-Z ]{0,12}")
            .prop_map(|(id, name, description)| todo(id, &name, &description))
    }

    proptest! {
        #[test]
        fn result_is_an_ordered_subset(
            todos in prop::collection::vec(arb_todo(), 0..16),
            query in "[a-zA-Z]{0,3}",
        ) {
            let result = filter_todos(&todos, &query);

            // Every result comes from the input, in the same relative order
            let mut rest = todos.iter();
            for item in &result {
                prop_assert!(rest.any(|t| std::ptr::eq(t, *item)));
            }
        }

        #[test]
        fn every_item_is_kept_iff_it_matches(
            todos in prop::collection::vec(arb_todo(), 0..16),
            query in "[a-zA-Z]{0,3}",
        ) {
            let result = filter_todos(&todos, &query);
            let needle = query.to_lowercase();

            for todo in &todos {
                let expected = todo.name.to_lowercase().contains(&needle)
                    || todo.description.to_lowercase().contains(&needle);
                let kept = result.iter().any(|t| std::ptr::eq(*t, todo));
                prop_assert_eq!(kept, expected);
            }
        }

        #[test]
        fn nothing_to_do_iff_no_item_matches(
            todos in prop::collection::vec(arb_todo(), 0..16),
            query in "[a-zA-Z]{0,3}",
        ) {
            let view = FilteredTodos::new(&todos, &query);
            prop_assert_eq!(view.is_nothing_to_do(), filter_todos(&todos, &query).is_empty());
        }

        #[test]
        fn query_case_does_not_matter(
            todos in prop::collection::vec(arb_todo(), 0..16),
            query in "[a-zA-Z]{0,3}",
        ) {
            let lower = filter_todos(&todos, &query.to_lowercase());
            let upper = filter_todos(&todos, &query.to_uppercase());
            prop_assert_eq!(lower, upper);
        }
    }
}
