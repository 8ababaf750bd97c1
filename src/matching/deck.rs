use crate::content::Catalog;
use crate::util::shuffled;
use rand::seq::SliceRandom;
use rand::Rng;

/// Board size for the memory game, expressed in pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Difficulty {
    #[strum(serialize = "easy")]
    Easy,
    #[strum(serialize = "medium")]
    Medium,
    #[strum(serialize = "hard")]
    Hard,
}

impl Difficulty {
    pub fn pair_count(self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 8,
            Difficulty::Hard => 12,
        }
    }
}

/// What the two faces of a pair show: a letter in its two cases, or a
/// vocabulary word in its two languages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchTheme {
    Letters,
    Words,
}

/// One face-down card on the board. Exactly two cards share a `group_key`.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: String,
    pub group_key: String,
    pub face: String,
    pub is_flipped: bool,
    pub is_matched: bool,
    pub position: usize,
}

impl Card {
    fn new(id: String, group_key: String, face: String) -> Self {
        Self {
            id,
            group_key,
            face,
            is_flipped: false,
            is_matched: false,
            position: 0,
        }
    }
}

/// Build a shuffled deck of `2 * pair_count` cards from the catalog.
pub fn build_deck<R: Rng>(
    catalog: &Catalog,
    theme: MatchTheme,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<Card> {
    let pair_count = difficulty.pair_count();

    let mut cards: Vec<Card> = match theme {
        MatchTheme::Letters => catalog
            .letters
            .choose_multiple(rng, pair_count)
            .flat_map(|letter| {
                [
                    Card::new(
                        format!("{}-upper", letter.id),
                        letter.id.clone(),
                        letter.upper.clone(),
                    ),
                    Card::new(
                        format!("{}-lower", letter.id),
                        letter.id.clone(),
                        letter.lower.clone(),
                    ),
                ]
            })
            .collect(),
        MatchTheme::Words => catalog
            .words
            .choose_multiple(rng, pair_count)
            .flat_map(|word| {
                [
                    Card::new(
                        format!("{}-el", word.id),
                        word.id.clone(),
                        word.display_greek(),
                    ),
                    Card::new(
                        format!("{}-en", word.id),
                        word.id.clone(),
                        word.english.clone(),
                    ),
                ]
            })
            .collect(),
    };

    cards = shuffled(&cards, rng);
    for (position, card) in cards.iter_mut().enumerate() {
        card.position = position;
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pair_counts() {
        assert_eq!(Difficulty::Easy.pair_count(), 6);
        assert_eq!(Difficulty::Medium.pair_count(), 8);
        assert_eq!(Difficulty::Hard.pair_count(), 12);
    }

    #[test]
    fn test_deck_has_every_group_exactly_twice() {
        let catalog = Catalog::load();
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut rng = StdRng::seed_from_u64(11);
            let deck = build_deck(&catalog, MatchTheme::Letters, difficulty, &mut rng);

            assert_eq!(deck.len(), 2 * difficulty.pair_count());

            let counts = deck.iter().counts_by(|c| c.group_key.clone());
            assert!(counts.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn test_deck_starts_face_down() {
        let catalog = Catalog::load();
        let mut rng = StdRng::seed_from_u64(2);
        let deck = build_deck(&catalog, MatchTheme::Words, Difficulty::Medium, &mut rng);

        assert!(deck.iter().all(|c| !c.is_flipped && !c.is_matched));
    }

    #[test]
    fn test_positions_are_contiguous() {
        let catalog = Catalog::load();
        let mut rng = StdRng::seed_from_u64(5);
        let deck = build_deck(&catalog, MatchTheme::Letters, Difficulty::Easy, &mut rng);

        let positions: Vec<usize> = deck.iter().map(|c| c.position).collect();
        assert_eq!(positions, (0..deck.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_letter_pair_faces_differ_in_case() {
        let catalog = Catalog::load();
        let mut rng = StdRng::seed_from_u64(8);
        let deck = build_deck(&catalog, MatchTheme::Letters, Difficulty::Easy, &mut rng);

        let mut faces: std::collections::HashMap<&str, Vec<&str>> = Default::default();
        for card in &deck {
            faces.entry(&card.group_key).or_default().push(&card.face);
        }
        for pair in faces.values() {
            assert_eq!(pair.len(), 2);
            assert_ne!(pair[0], pair[1]);
        }

        assert!(deck
            .iter()
            .all(|c| c.id.ends_with("-upper") || c.id.ends_with("-lower")));
    }

    #[test]
    fn test_word_deck_faces() {
        let catalog = Catalog::load();
        let mut rng = StdRng::seed_from_u64(13);
        let deck = build_deck(&catalog, MatchTheme::Words, Difficulty::Easy, &mut rng);

        for card in &deck {
            if card.id.ends_with("-en") {
                let word = catalog.words.iter().find(|w| w.id == card.group_key).unwrap();
                assert_eq!(card.face, word.english);
            }
        }
    }
}
