use crate::context::SuggestionContext;
use crate::provider::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

/// What the host UI should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingAction {
    None,
    /// Ask the engine for a suggestion for this context.
    Request(SuggestionContext),
    /// The inline suggestion was accepted; the field should show `value`
    /// with the caret at `cursor`.
    Accepted { value: String, cursor: usize },
    /// Suggestion and highlight were dropped.
    Dismissed,
    /// A highlighted result was chosen.
    Navigate { href: String },
}

/// Headless state machine binding a text field to the suggestion engine.
///
/// The host feeds it input, key, composition, pointer and focus events and
/// executes the returned [`BindingAction`]s. Cursor positions are character
/// offsets into `value`.
#[derive(Debug, Default)]
pub struct InputBinding {
    value: String,
    cursor: usize,
    composing: bool,
    suggestion: Option<Suggestion>,
    highlighted: Option<usize>,
    result_hrefs: Vec<String>,
}

impl InputBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The remainder to ghost-render after the caret, if any.
    pub fn ghost_text(&self) -> Option<&str> {
        self.suggestion.as_ref().map(|s| s.text.as_str())
    }

    pub fn set_suggestion(&mut self, suggestion: Option<Suggestion>) {
        self.suggestion = suggestion;
    }

    /// Replace the visible result list. The highlight resets because indices
    /// into the old list are meaningless against the new one.
    pub fn set_results(&mut self, hrefs: Vec<String>) {
        self.result_hrefs = hrefs;
        self.highlighted = None;
    }

    /// The field's value or caret changed.
    pub fn input(&mut self, value: &str, cursor: usize) -> BindingAction {
        self.value = value.to_string();
        self.cursor = cursor.min(value.chars().count());
        self.suggestion = None;
        self.highlighted = None;
        if self.composing {
            return BindingAction::None;
        }
        BindingAction::Request(SuggestionContext::new(&self.value, self.cursor))
    }

    /// An IME composition session opened; suggestions stay out of its way.
    pub fn composition_start(&mut self) -> BindingAction {
        self.composing = true;
        self.dismiss()
    }

    /// The composition committed; suggest against the final text.
    pub fn composition_end(&mut self, value: &str, cursor: usize) -> BindingAction {
        self.composing = false;
        self.input(value, cursor)
    }

    pub fn key_down(&mut self, key: Key) -> BindingAction {
        match key {
            Key::Tab => self.accept(),
            Key::ArrowRight => {
                // Only a caret already at the end of the value accepts;
                // anywhere else the arrow is plain cursor movement.
                if self.cursor == self.value.chars().count() {
                    self.accept()
                } else {
                    BindingAction::None
                }
            }
            Key::ArrowDown => self.move_highlight(1),
            Key::ArrowUp => self.move_highlight(-1),
            Key::Enter => self.choose_highlighted(),
            Key::Escape => self.dismiss(),
        }
    }

    /// A pointer went down somewhere; `inside` is whether it hit the widget.
    pub fn pointer_down(&mut self, inside: bool) -> BindingAction {
        if inside {
            BindingAction::None
        } else {
            self.dismiss()
        }
    }

    pub fn blur(&mut self) -> BindingAction {
        self.dismiss()
    }

    fn accept(&mut self) -> BindingAction {
        let Some(suggestion) = self.suggestion.take() else {
            return BindingAction::None;
        };
        // Splice the completion in at the caret; any text after the caret
        // is dropped rather than stitched behind the completion.
        let mut value: String = self.value.chars().take(self.cursor).collect();
        value.push_str(&suggestion.text);
        let cursor = value.chars().count();
        self.value = value.clone();
        self.cursor = cursor;
        self.highlighted = None;
        BindingAction::Accepted { value, cursor }
    }

    fn move_highlight(&mut self, delta: isize) -> BindingAction {
        let len = self.result_hrefs.len();
        if len == 0 {
            return BindingAction::None;
        }
        let next = match self.highlighted {
            None => {
                if delta > 0 {
                    0
                } else {
                    len - 1
                }
            }
            Some(current) => (current as isize + delta).rem_euclid(len as isize) as usize,
        };
        self.highlighted = Some(next);
        BindingAction::None
    }

    fn choose_highlighted(&mut self) -> BindingAction {
        let Some(index) = self.highlighted else {
            return BindingAction::None;
        };
        let Some(href) = self.result_hrefs.get(index).cloned() else {
            return BindingAction::None;
        };
        self.suggestion = None;
        self.highlighted = None;
        self.result_hrefs.clear();
        BindingAction::Navigate { href }
    }

    fn dismiss(&mut self) -> BindingAction {
        let had_state = self.suggestion.is_some() || self.highlighted.is_some();
        self.suggestion = None;
        self.highlighted = None;
        if had_state {
            BindingAction::Dismissed
        } else {
            BindingAction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suggestion(text: &str) -> Suggestion {
        Suggestion {
            text: text.to_string(),
            confidence: 90,
            provider_id: "tsl-search".to_string(),
        }
    }

    #[test]
    fn input_requests_a_suggestion_for_the_new_context() {
        let mut binding = InputBinding::new();
        let action = binding.input("math n", 6);
        assert_eq!(
            action,
            BindingAction::Request(SuggestionContext::new("math n", 6))
        );
    }

    #[test]
    fn input_drops_the_stale_suggestion() {
        let mut binding = InputBinding::new();
        binding.input("math n", 6);
        binding.set_suggestion(Some(suggestion("ode")));
        binding.input("math no", 7);
        assert_eq!(binding.suggestion(), None);
    }

    #[test]
    fn tab_accepts_and_moves_the_caret_to_the_end() {
        let mut binding = InputBinding::new();
        binding.input("math n", 6);
        binding.set_suggestion(Some(suggestion("ode")));
        let action = binding.key_down(Key::Tab);
        assert_eq!(
            action,
            BindingAction::Accepted {
                value: "math node".to_string(),
                cursor: 9,
            }
        );
        assert_eq!(binding.value(), "math node");
        assert_eq!(binding.cursor(), 9);
    }

    #[test]
    fn accepting_mid_value_drops_the_tail() {
        let mut binding = InputBinding::new();
        binding.input("math n tail", 6);
        binding.set_suggestion(Some(suggestion("ode")));
        let action = binding.key_down(Key::Tab);
        assert_eq!(
            action,
            BindingAction::Accepted {
                value: "math node".to_string(),
                cursor: 9,
            }
        );
    }

    #[test]
    fn arrow_right_accepts_only_at_the_end_of_the_value() {
        let mut binding = InputBinding::new();
        binding.input("math n", 3);
        binding.set_suggestion(Some(suggestion("ode")));
        assert_eq!(binding.key_down(Key::ArrowRight), BindingAction::None);
        assert!(binding.suggestion().is_some());

        binding.input("math n", 6);
        binding.set_suggestion(Some(suggestion("ode")));
        assert!(matches!(
            binding.key_down(Key::ArrowRight),
            BindingAction::Accepted { .. }
        ));
    }

    #[test]
    fn tab_without_a_suggestion_does_nothing() {
        let mut binding = InputBinding::new();
        binding.input("math", 4);
        assert_eq!(binding.key_down(Key::Tab), BindingAction::None);
    }

    #[test]
    fn composition_suppresses_requests_until_it_ends() {
        let mut binding = InputBinding::new();
        binding.input("ま", 1);
        binding.set_suggestion(Some(suggestion("th")));

        assert_eq!(binding.composition_start(), BindingAction::Dismissed);
        assert_eq!(binding.input("まt", 2), BindingAction::None);

        let action = binding.composition_end("math", 4);
        assert_eq!(
            action,
            BindingAction::Request(SuggestionContext::new("math", 4))
        );
    }

    #[test]
    fn arrows_wrap_around_the_result_list() {
        let mut binding = InputBinding::new();
        binding.set_results(vec![
            "/math/add#add".to_string(),
            "/math/sub#sub".to_string(),
            "/math/mul#mul".to_string(),
        ]);

        binding.key_down(Key::ArrowDown);
        assert_eq!(binding.highlighted(), Some(0));
        binding.key_down(Key::ArrowUp);
        assert_eq!(binding.highlighted(), Some(2));
        binding.key_down(Key::ArrowDown);
        assert_eq!(binding.highlighted(), Some(0));
    }

    #[test]
    fn arrow_up_from_nothing_highlights_the_last_result() {
        let mut binding = InputBinding::new();
        binding.set_results(vec!["/a#a".to_string(), "/b#b".to_string()]);
        binding.key_down(Key::ArrowUp);
        assert_eq!(binding.highlighted(), Some(1));
    }

    #[test]
    fn enter_navigates_to_the_highlighted_result_and_clears_state() {
        let mut binding = InputBinding::new();
        binding.set_results(vec!["/a#a".to_string(), "/b#b".to_string()]);
        binding.key_down(Key::ArrowDown);
        binding.key_down(Key::ArrowDown);
        let action = binding.key_down(Key::Enter);
        assert_eq!(
            action,
            BindingAction::Navigate {
                href: "/b#b".to_string()
            }
        );
        assert_eq!(binding.highlighted(), None);
    }

    #[test]
    fn enter_without_a_highlight_does_nothing() {
        let mut binding = InputBinding::new();
        binding.set_results(vec!["/a#a".to_string()]);
        assert_eq!(binding.key_down(Key::Enter), BindingAction::None);
    }

    #[test]
    fn escape_blur_and_outside_pointer_dismiss() {
        let mut binding = InputBinding::new();
        binding.set_results(vec!["/a#a".to_string()]);
        binding.key_down(Key::ArrowDown);
        binding.set_suggestion(Some(suggestion("x")));

        assert_eq!(binding.key_down(Key::Escape), BindingAction::Dismissed);
        assert_eq!(binding.suggestion(), None);
        assert_eq!(binding.highlighted(), None);

        binding.set_suggestion(Some(suggestion("x")));
        assert_eq!(binding.pointer_down(true), BindingAction::None);
        assert!(binding.suggestion().is_some());
        assert_eq!(binding.pointer_down(false), BindingAction::Dismissed);

        binding.set_suggestion(Some(suggestion("x")));
        assert_eq!(binding.blur(), BindingAction::Dismissed);
    }

    #[test]
    fn new_results_reset_the_highlight() {
        let mut binding = InputBinding::new();
        binding.set_results(vec!["/a#a".to_string(), "/b#b".to_string()]);
        binding.key_down(Key::ArrowDown);
        binding.set_results(vec!["/c#c".to_string()]);
        assert_eq!(binding.highlighted(), None);
    }

    #[test]
    fn cursor_offsets_are_character_based() {
        let mut binding = InputBinding::new();
        binding.input("héllo w", 7);
        binding.set_suggestion(Some(suggestion("orld")));
        let action = binding.key_down(Key::Tab);
        assert_eq!(
            action,
            BindingAction::Accepted {
                value: "héllo world".to_string(),
                cursor: 11,
            }
        );
    }
}
