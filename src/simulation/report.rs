use crate::card::Card;
use crate::condition::Condition;
use crate::simulation::branch::{Simulation, SimulationBranch};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Seen/drawn tallies for one card name or tag.
///
/// `seen_count` maps "copies in hand" to the number of trials where
/// exactly that many were seen. `drawn_count` is the number of times a
/// copy was drawn mid-trial by a free card effect.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStats {
    pub seen_count: BTreeMap<usize, usize>,
    pub drawn_count: usize,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeCardCounts {
    pub used_to_win_count: usize,
    pub unused_count: usize,
}

/// Whether a free card contributed to wins, tallied both per winning
/// branch and once per simulation.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeCardStats {
    pub conditions: FreeCardCounts,
    pub overall: FreeCardCounts,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionStats {
    pub success_count: usize,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub sub_condition_stats: IndexMap<String, usize>,
}

/// Aggregated output of a batch of simulations, keyed by card name,
/// tag, and the canonical rendering of each condition.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub iterations: usize,
    pub successful_simulations: usize,
    pub card_name_stats: IndexMap<String, CardStats>,
    pub card_tag_stats: IndexMap<String, CardStats>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub banished_card_name_stats: IndexMap<String, CardStats>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub banished_card_tag_stats: IndexMap<String, CardStats>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub discarded_card_name_stats: IndexMap<String, CardStats>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub discarded_card_tag_stats: IndexMap<String, CardStats>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub free_card_stats: IndexMap<String, FreeCardStats>,
    pub condition_stats: IndexMap<String, ConditionStats>,
}

impl SimulationReport {
    /// Fraction of simulations where any condition held, 0.0 to 1.0.
    pub fn success_rate(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.successful_simulations as f64 / self.iterations as f64
    }

    pub fn condition_rate(&self, rendering: &str) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.condition_stats
            .get(rendering)
            .map_or(0.0, |stats| stats.success_count as f64 / self.iterations as f64)
    }
}

fn name_counts(cards: &[Card]) -> IndexMap<&str, usize> {
    let mut counts = IndexMap::new();
    for card in cards {
        *counts.entry(card.name.as_str()).or_insert(0) += 1;
    }
    counts
}

fn tag_counts(cards: &[Card]) -> IndexMap<&str, usize> {
    let mut counts = IndexMap::new();
    for card in cards {
        for tag in &card.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

fn record_seen(store: &mut IndexMap<String, CardStats>, counts: IndexMap<&str, usize>) {
    for (key, count) in counts {
        let stats = store.entry(key.to_string()).or_default();
        *stats.seen_count.entry(count).or_insert(0) += 1;
    }
}

fn record_initial_hand(report: &mut SimulationReport, hand: &[Card]) {
    record_seen(&mut report.card_name_stats, name_counts(hand));
    record_seen(&mut report.card_tag_stats, tag_counts(hand));
}

/// Walks each condition's branch chain and credits every card that
/// entered the hand after the opening draw.
fn record_drawn_cards(report: &mut SimulationReport, branches: &[SimulationBranch]) {
    for pair in branches.windows(2) {
        let mut previous = name_counts(pair[0].game_state().hand());
        for card in pair[1].game_state().hand() {
            match previous.get_mut(card.name.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => {
                    report
                        .card_name_stats
                        .entry(card.name.clone())
                        .or_default()
                        .drawn_count += 1;
                    for tag in &card.tags {
                        report
                            .card_tag_stats
                            .entry(tag.clone())
                            .or_default()
                            .drawn_count += 1;
                    }
                }
            }
        }
    }
}

fn record_pile(
    name_store: &mut IndexMap<String, CardStats>,
    tag_store: &mut IndexMap<String, CardStats>,
    pile: &[Card],
) {
    if pile.is_empty() {
        return;
    }
    record_seen(name_store, name_counts(pile));
    record_seen(tag_store, tag_counts(pile));
}

fn record_free_cards(report: &mut SimulationReport, simulation: &Simulation, conditions: &[Condition]) {
    // Per winning branch: cards played on the way there helped win,
    // free cards still in hand were not needed.
    for index in 0..conditions.len() {
        let Some(winner) = simulation.successful_branch(index) else {
            continue;
        };
        for card in winner.game_state().free_cards_played() {
            report
                .free_card_stats
                .entry(card.name.clone())
                .or_default()
                .conditions
                .used_to_win_count += 1;
        }
        for card in winner.game_state().free_cards_in_hand() {
            report
                .free_card_stats
                .entry(card.name.clone())
                .or_default()
                .conditions
                .unused_count += 1;
        }
    }

    // Per simulation: if any winner still held a free card the win
    // did not depend on free cards at all.
    let winners: Vec<&SimulationBranch> = (0..conditions.len())
        .filter_map(|index| simulation.successful_branch(index))
        .collect();

    let mut unused: Vec<String> = Vec::new();
    let mut played: Vec<String> = Vec::new();
    for winner in &winners {
        for card in winner.game_state().free_cards_in_hand() {
            if !unused.contains(&card.name) {
                unused.push(card.name.clone());
            }
        }
        for card in winner.game_state().free_cards_played() {
            if !played.contains(&card.name) {
                played.push(card.name.clone());
            }
        }
    }

    if !unused.is_empty() {
        for name in unused {
            report.free_card_stats.entry(name).or_default().overall.unused_count += 1;
        }
    } else {
        for name in played {
            report
                .free_card_stats
                .entry(name)
                .or_default()
                .overall
                .used_to_win_count += 1;
        }
    }
}

fn record_condition_stats(
    report: &mut SimulationReport,
    simulation: &Simulation,
    conditions: &[Condition],
) {
    for (index, condition) in conditions.iter().enumerate() {
        let rendering = condition.to_string();
        let stats = report.condition_stats.entry(rendering.clone()).or_default();

        let Some(winner) = simulation.successful_branch(index) else {
            continue;
        };
        stats.success_count += 1;

        for satisfied in winner.satisfied_conditions() {
            if *satisfied != rendering {
                *stats.sub_condition_stats.entry(satisfied.clone()).or_insert(0) += 1;
            }
        }
    }
}

/// Aggregate a batch of simulations into per-card, per-tag, and
/// per-condition statistics.
pub fn generate_report(simulations: &[Simulation], conditions: &[Condition]) -> SimulationReport {
    let mut report = SimulationReport {
        iterations: simulations.len(),
        successful_simulations: simulations.iter().filter(|s| s.is_successful()).count(),
        ..Default::default()
    };

    for simulation in simulations {
        record_initial_hand(&mut report, simulation.game_state().hand());

        for branches in simulation.branches() {
            record_drawn_cards(&mut report, branches);
        }

        for index in 0..conditions.len() {
            if let Some(winner) = simulation.successful_branch(index) {
                let state = winner.game_state();
                record_pile(
                    &mut report.banished_card_name_stats,
                    &mut report.banished_card_tag_stats,
                    state.banish_pile(),
                );
                record_pile(
                    &mut report.discarded_card_name_stats,
                    &mut report.discarded_card_tag_stats,
                    state.graveyard(),
                );
            }
        }

        record_free_cards(&mut report, simulation, conditions);
        record_condition_stats(&mut report, simulation, conditions);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, CardDetails, FreeCardDetails};
    use crate::condition::parse_condition;
    use crate::game::{Deck, GameState};

    fn named(name: &str) -> Card {
        Card::new(name, &CardDetails::default())
    }

    fn tagged(name: &str, tags: &[&str]) -> Card {
        Card::new(
            name,
            &CardDetails {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
        )
    }

    fn draw_card(name: &str, count: usize) -> Card {
        Card::new(
            name,
            &CardDetails {
                free: Some(FreeCardDetails {
                    count,
                    once_per_turn: false,
                    cost: None,
                    restrictions: Vec::new(),
                    excavate: None,
                    post_condition: None,
                }),
                ..Default::default()
            },
        )
    }

    fn simulate(hand: Vec<Card>, deck: Vec<Card>, conditions: &[Condition]) -> Simulation {
        let hand_size = hand.len();
        let mut state = GameState::new(Deck::new(
            hand.into_iter().chain(deck).collect(),
            0,
        ));
        state.draw_hand(hand_size);
        Simulation::run(state, conditions)
    }

    #[test]
    fn counts_iterations_and_successes() {
        let conditions = vec![parse_condition("Card A").unwrap()];
        let simulations = vec![
            simulate(vec![named("Card A")], vec![], &conditions),
            simulate(vec![named("Card B")], vec![], &conditions),
        ];

        let report = generate_report(&simulations, &conditions);

        assert_eq!(report.iterations, 2);
        assert_eq!(report.successful_simulations, 1);
        assert!((report.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn records_seen_counts_by_copies() {
        let conditions = vec![parse_condition("Card A").unwrap()];
        let simulations = vec![simulate(
            vec![named("Card A"), named("Card A"), tagged("Card B", &["Spell"])],
            vec![],
            &conditions,
        )];

        let report = generate_report(&simulations, &conditions);

        assert_eq!(report.card_name_stats["Card A"].seen_count[&2], 1);
        assert_eq!(report.card_name_stats["Card B"].seen_count[&1], 1);
        assert_eq!(report.card_tag_stats["Spell"].seen_count[&1], 1);
    }

    #[test]
    fn records_cards_drawn_by_free_cards() {
        let conditions = vec![parse_condition("Card A").unwrap()];
        let simulations = vec![simulate(
            vec![draw_card("Pot", 1)],
            vec![named("Card A")],
            &conditions,
        )];

        let report = generate_report(&simulations, &conditions);

        assert_eq!(report.card_name_stats["Card A"].drawn_count, 1);
    }

    #[test]
    fn free_card_credited_when_it_wins() {
        let conditions = vec![parse_condition("Card A").unwrap()];
        let simulations = vec![simulate(
            vec![draw_card("Pot", 1)],
            vec![named("Card A")],
            &conditions,
        )];

        let report = generate_report(&simulations, &conditions);

        let stats = &report.free_card_stats["Pot"];
        assert_eq!(stats.conditions.used_to_win_count, 1);
        assert_eq!(stats.overall.used_to_win_count, 1);
        assert_eq!(stats.overall.unused_count, 0);
    }

    #[test]
    fn free_card_counted_unused_when_hand_wins_alone() {
        let conditions = vec![parse_condition("Card A").unwrap()];
        let simulations = vec![simulate(
            vec![named("Card A"), draw_card("Pot", 1)],
            vec![named("Card B")],
            &conditions,
        )];

        let report = generate_report(&simulations, &conditions);

        let stats = &report.free_card_stats["Pot"];
        assert_eq!(stats.conditions.unused_count, 1);
        assert_eq!(stats.overall.unused_count, 1);
        assert_eq!(stats.overall.used_to_win_count, 0);
    }

    #[test]
    fn per_condition_success_counts_use_canonical_renderings() {
        let conditions = vec![
            parse_condition("Card A").unwrap(),
            parse_condition("2+ Card B").unwrap(),
        ];
        let simulations = vec![
            simulate(vec![named("Card A")], vec![], &conditions),
            simulate(vec![named("Card C")], vec![], &conditions),
        ];

        let report = generate_report(&simulations, &conditions);

        assert_eq!(report.condition_stats["1+ Card A IN HAND"].success_count, 1);
        assert_eq!(report.condition_stats["2+ Card B IN HAND"].success_count, 0);
        assert!((report.condition_rate("1+ Card A IN HAND") - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sub_condition_counts_come_from_the_winning_branch() {
        let conditions = vec![parse_condition("Card A OR Card B").unwrap()];
        let simulations = vec![simulate(
            vec![named("Card A"), named("Card C")],
            vec![],
            &conditions,
        )];

        let report = generate_report(&simulations, &conditions);

        let stats = &report.condition_stats["1+ Card A IN HAND OR 1+ Card B IN HAND"];
        assert_eq!(stats.success_count, 1);
        assert_eq!(stats.sub_condition_stats["1+ Card A IN HAND"], 1);
        assert!(!stats.sub_condition_stats.contains_key("1+ Card B IN HAND"));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let conditions = vec![parse_condition("Card A").unwrap()];
        let simulations = vec![simulate(vec![named("Card A")], vec![], &conditions)];

        let report = generate_report(&simulations, &conditions);
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"successfulSimulations\":1"));
        assert!(json.contains("\"cardNameStats\""));
        assert!(json.contains("\"seenCount\""));
    }
}
