use crate::condition::{evaluate, Condition, EvaluationResult};
use crate::game::GameState;
use crate::simulation::free_card;

/// One explored line of play: a game state snapshot and how the
/// condition fared against it.
#[derive(Debug, Clone)]
pub struct SimulationBranch {
    game_state: GameState,
    result: EvaluationResult,
}

impl SimulationBranch {
    fn run(game_state: GameState, condition: &Condition) -> Self {
        let result = evaluate(condition, game_state.hand(), game_state.deck().cards());
        SimulationBranch { game_state, result }
    }

    pub fn is_successful(&self) -> bool {
        self.result.success
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    /// Canonical renderings of every sub-condition that held.
    pub fn satisfied_conditions(&self) -> &[String] {
        &self.result.satisfied
    }
}

/// All branches explored for one drawn hand, grouped per condition.
#[derive(Debug, Clone)]
pub struct Simulation {
    game_state: GameState,
    branches: Vec<Vec<SimulationBranch>>,
}

impl Simulation {
    /// Evaluate every condition against the initial state, branching
    /// on free card activations when the pristine state fails. The
    /// search is depth-first and stops cold once any condition has a
    /// winning branch.
    pub fn run(game_state: GameState, conditions: &[Condition]) -> Self {
        let mut simulation = Simulation {
            game_state,
            branches: vec![Vec::new(); conditions.len()],
        };

        for (index, condition) in conditions.iter().enumerate() {
            let branch = SimulationBranch::run(simulation.game_state.clone(), condition);
            simulation.branches[index].push(branch);
            if simulation.is_successful() {
                continue;
            }

            let initial = simulation.game_state.clone();
            simulation.explore_free_cards(index, &initial, condition, &mut Vec::new());
        }

        simulation
    }

    /// Try each usable free card in hand, one branch per activation,
    /// recursing into failed branches with the remaining cards. Cards
    /// already played along the current path are skipped by name so
    /// repeatable cards cannot chain forever.
    fn explore_free_cards(
        &mut self,
        index: usize,
        state: &GameState,
        condition: &Condition,
        used: &mut Vec<String>,
    ) -> bool {
        for hand_index in state.free_card_indexes() {
            let card = &state.hand()[hand_index];
            if used.contains(&card.name) || !free_card::is_usable(state, card) {
                continue;
            }
            let name = card.name.clone();

            let mut next = state.clone();
            if free_card::activate(&mut next, hand_index, condition).is_err() {
                continue;
            }

            let branch = SimulationBranch::run(next, condition);
            if branch.is_successful() {
                self.branches[index].push(branch);
                return true;
            }

            let resulting = branch.game_state.clone();
            self.branches[index].push(branch);

            used.push(name);
            let found = self.explore_free_cards(index, &resulting, condition, used);
            used.pop();
            if found {
                return true;
            }
        }

        false
    }

    /// Whether any condition found a winning branch.
    pub fn is_successful(&self) -> bool {
        self.branches
            .iter()
            .any(|branches| branches.iter().any(SimulationBranch::is_successful))
    }

    /// The hand this simulation started from, before any branching.
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn branches(&self) -> &[Vec<SimulationBranch>] {
        &self.branches
    }

    /// First winning branch for the condition at `index`, if any.
    pub fn successful_branch(&self, index: usize) -> Option<&SimulationBranch> {
        self.branches
            .get(index)?
            .iter()
            .find(|branch| branch.is_successful())
    }

    pub fn condition_successful(&self, index: usize) -> bool {
        self.successful_branch(index).is_some()
    }
}
