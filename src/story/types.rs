//! Core story types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Seed text for a fresh draft card.
const TEMPLATE_TEXT: &str = "Describe the scene, then ask the player something.";

/// One selectable choice on a card.
///
/// `next_id` points at the card the player moves to when this choice is
/// taken. References are never validated: a `next_id` with no matching
/// card is accepted everywhere and only surfaces when a playthrough
/// reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Label shown to the player
    pub text: String,
    /// Id of the destination card
    pub next_id: u32,
}

/// A single passage of the story.
///
/// A card with an empty options map is an ending: a playthrough stops
/// there. Option keys are arbitrary strings with no ordering or
/// contiguity requirement; they serialize sorted because the map is a
/// `BTreeMap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique id within the story, assigned at submit time
    pub id: u32,
    /// Passage text shown to the player
    pub text: String,
    /// Choices leading out of this card, keyed by label
    pub options: BTreeMap<String, Choice>,
}

/// The whole editable story and root export unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story title; drives the export filename
    pub title: String,
    /// Committed cards in submission order
    pub entries: Vec<Card>,
}

/// In-progress form data for the next card.
///
/// Distinct from [`Card`]: a draft has no id until it is committed, and
/// committing copies it into the story rather than moving it, so the
/// form keeps its contents for the next submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Passage text for the card being composed
    pub text: String,
    /// Choices for the card being composed
    pub options: BTreeMap<String, Choice>,
}

/// The fixed two-option template.
///
/// Seeds a fresh draft, and is what the ending toggle installs when a
/// card is switched back from an ending. The restored options are always
/// exactly these, never the card's previous options.
pub fn default_options() -> BTreeMap<String, Choice> {
    BTreeMap::from([
        (
            String::from("1"),
            Choice {
                text: String::from("The first choice."),
                next_id: 2,
            },
        ),
        (
            String::from("2"),
            Choice {
                text: String::from("The second choice."),
                next_id: 3,
            },
        ),
    ])
}

impl Draft {
    /// A draft seeded with placeholder text and the default options.
    pub fn template() -> Self {
        Self {
            text: String::from(TEMPLATE_TEXT),
            options: default_options(),
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::template()
    }
}

impl Card {
    /// True when this card has no outgoing choices.
    pub fn is_ending(&self) -> bool {
        self.options.is_empty()
    }

    /// Turn this card into an ending by discarding all options.
    ///
    /// The discarded options are gone; toggling back installs the
    /// default template via [`Card::restore_default_options`].
    pub fn clear_options(&mut self) {
        self.options.clear();
    }

    /// Replace this card's options with the default template.
    pub fn restore_default_options(&mut self) {
        self.options = default_options();
    }
}

impl Story {
    /// Create an empty story with the given title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// The id the next committed card will receive.
    ///
    /// One greater than the highest existing id, or 1 for an empty
    /// story. Deleted ids are never reused: after removing the card
    /// with the highest id, the next id still moves past the remaining
    /// maximum, not past the removed one.
    pub fn next_card_id(&self) -> u32 {
        self.entries
            .iter()
            .map(|card| card.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Append a copy of the draft as a committed card and return its id.
    ///
    /// Existing cards are never touched by a submit.
    pub fn push_draft(&mut self, draft: &Draft) -> u32 {
        let id = self.next_card_id();
        self.entries.push(Card {
            id,
            text: draft.text.clone(),
            options: draft.options.clone(),
        });
        id
    }

    /// Remove the card with the given id.
    ///
    /// Returns whether a card was removed. Remaining cards keep their
    /// ids, and choices elsewhere that pointed at the removed card are
    /// left dangling on purpose.
    pub fn remove_card(&mut self, id: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|card| card.id != id);
        self.entries.len() != before
    }

    /// Look up a card by id.
    pub fn card(&self, id: u32) -> Option<&Card> {
        self.entries.iter().find(|card| card.id == id)
    }

    /// Look up a card by id for mutation.
    pub fn card_mut(&mut self, id: u32) -> Option<&mut Card> {
        self.entries.iter_mut().find(|card| card.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story_with_cards(count: u32) -> Story {
        let mut story = Story::default();
        let draft = Draft::template();
        for _ in 0..count {
            story.push_draft(&draft);
        }
        story
    }

    #[test]
    fn test_next_card_id_starts_at_one() {
        let story = Story::default();
        assert_eq!(story.next_card_id(), 1);
    }

    #[test]
    fn test_sequential_submits_assign_one_to_n() {
        let story = story_with_cards(5);
        let ids: Vec<u32> = story.entries.iter().map(|card| card.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_deleted_id_is_not_reused() {
        let mut story = story_with_cards(2);
        assert!(story.remove_card(1));
        let id = story.push_draft(&Draft::template());
        assert_eq!(id, 3);
    }

    #[test]
    fn test_delete_highest_id_steps_back() {
        let mut story = story_with_cards(3);
        assert!(story.remove_card(3));
        assert_eq!(story.next_card_id(), 3);
    }

    #[test]
    fn test_submit_never_mutates_existing_cards() {
        let mut story = story_with_cards(2);
        let snapshot = story.entries.clone();
        story.push_draft(&Draft::template());
        assert_eq!(&story.entries[..2], &snapshot[..]);
    }

    #[test]
    fn test_remove_card_missing_id_is_noop() {
        let mut story = story_with_cards(2);
        assert!(!story.remove_card(99));
        assert_eq!(story.entries.len(), 2);
    }

    #[test]
    fn test_remove_card_keeps_other_ids() {
        let mut story = story_with_cards(3);
        story.remove_card(2);
        let ids: Vec<u32> = story.entries.iter().map(|card| card.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_clear_options_makes_ending() {
        let mut story = story_with_cards(1);
        let card = story.card_mut(1).unwrap();
        assert!(!card.is_ending());
        card.clear_options();
        assert!(card.is_ending());
        assert!(card.options.is_empty());
    }

    #[test]
    fn test_restore_installs_template_not_prior_options() {
        let mut story = story_with_cards(1);
        let card = story.card_mut(1).unwrap();
        card.options.get_mut("1").unwrap().text = String::from("Climb the wall");
        card.options.get_mut("1").unwrap().next_id = 42;

        card.clear_options();
        card.restore_default_options();

        assert_eq!(card.options, default_options());
        assert_ne!(card.options["1"].next_id, 42);
    }

    #[test]
    fn test_card_lookup_by_id() {
        let mut story = story_with_cards(3);
        assert_eq!(story.card(2).map(|card| card.id), Some(2));
        assert!(story.card(7).is_none());
        story.card_mut(2).unwrap().text = String::from("changed");
        assert_eq!(story.card(2).unwrap().text, "changed");
    }

    #[test]
    fn test_draft_template_matches_default_options() {
        let draft = Draft::template();
        assert_eq!(draft.options, default_options());
        assert!(!draft.text.is_empty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ids_stay_unique_under_add_delete(ops in prop::collection::vec(prop::option::of(0..20u32), 0..40)) {
                let mut story = Story::default();
                let draft = Draft::template();
                // None = submit, Some(i) = delete the card at slot i (when present)
                for op in ops {
                    match op {
                        None => {
                            story.push_draft(&draft);
                        }
                        Some(slot) => {
                            if let Some(card) = story.entries.get(slot as usize) {
                                let id = card.id;
                                story.remove_card(id);
                            }
                        }
                    }
                    let mut ids: Vec<u32> = story.entries.iter().map(|card| card.id).collect();
                    let total = ids.len();
                    ids.sort_unstable();
                    ids.dedup();
                    prop_assert_eq!(ids.len(), total);
                }
            }

            #[test]
            fn next_id_exceeds_every_existing_id(adds in 1..30u32, delete_slot in 0..30u32) {
                let mut story = Story::default();
                let draft = Draft::template();
                for _ in 0..adds {
                    story.push_draft(&draft);
                }
                if let Some(card) = story.entries.get(delete_slot as usize) {
                    let id = card.id;
                    story.remove_card(id);
                }
                let next = story.next_card_id();
                for card in &story.entries {
                    prop_assert!(next > card.id);
                }
            }
        }
    }
}
