//! Research loop phases and the transition table that connects them.
//!
//! ```text
//! PlanQueries ──▶ Retrieve ──▶ Assess ──satisfied──▶ Compose ──▶ (finish)
//!      ▲                          │
//!      └──────── unsatisfied ─────┘
//! ```
//!
//! The table is checked at construction: every phase has a defined exit
//! for every predicate outcome, and only [`ResearchPhase::Compose`] finishes.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Node of the research state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResearchPhase {
    PlanQueries,
    Retrieve,
    Assess,
    Compose,
}

impl ResearchPhase {
    pub const ALL: [ResearchPhase; 4] = [
        ResearchPhase::PlanQueries,
        ResearchPhase::Retrieve,
        ResearchPhase::Assess,
        ResearchPhase::Compose,
    ];

    /// Entry phase of every research cycle.
    pub const INITIAL: ResearchPhase = ResearchPhase::PlanQueries;

    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchPhase::PlanQueries => "plan_queries",
            ResearchPhase::Retrieve => "retrieve",
            ResearchPhase::Assess => "assess",
            ResearchPhase::Compose => "compose",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ResearchPhase::PlanQueries => "Writing queries",
            ResearchPhase::Retrieve => "Querying and summarizing sources",
            ResearchPhase::Assess => "Assessing resources",
            ResearchPhase::Compose => "Writing response",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ResearchPhase::Compose)
    }

    fn index(self) -> usize {
        match self {
            ResearchPhase::PlanQueries => 0,
            ResearchPhase::Retrieve => 1,
            ResearchPhase::Assess => 2,
            ResearchPhase::Compose => 3,
        }
    }
}

impl std::fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Value of the routing predicate after a phase ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Satisfied,
    Unsatisfied,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Satisfied, Outcome::Unsatisfied];

    pub fn from_satisfied(satisfied: bool) -> Self {
        if satisfied {
            Outcome::Satisfied
        } else {
            Outcome::Unsatisfied
        }
    }

    fn index(self) -> usize {
        match self {
            Outcome::Satisfied => 0,
            Outcome::Unsatisfied => 1,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Satisfied => write!(f, "satisfied"),
            Outcome::Unsatisfied => write!(f, "unsatisfied"),
        }
    }
}

/// Where a phase goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    To(ResearchPhase),
    Finish,
}

/// Edges of the standard research loop.
pub const RESEARCH_LOOP_EDGES: [(ResearchPhase, Outcome, Transition); 8] = [
    (ResearchPhase::PlanQueries, Outcome::Satisfied, Transition::To(ResearchPhase::Retrieve)),
    (ResearchPhase::PlanQueries, Outcome::Unsatisfied, Transition::To(ResearchPhase::Retrieve)),
    (ResearchPhase::Retrieve, Outcome::Satisfied, Transition::To(ResearchPhase::Assess)),
    (ResearchPhase::Retrieve, Outcome::Unsatisfied, Transition::To(ResearchPhase::Assess)),
    (ResearchPhase::Assess, Outcome::Satisfied, Transition::To(ResearchPhase::Compose)),
    (ResearchPhase::Assess, Outcome::Unsatisfied, Transition::To(ResearchPhase::PlanQueries)),
    (ResearchPhase::Compose, Outcome::Satisfied, Transition::Finish),
    (ResearchPhase::Compose, Outcome::Unsatisfied, Transition::Finish),
];

/// Exhaustive `(phase, outcome) -> transition` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    edges: [[Transition; 2]; 4],
}

impl TransitionTable {
    /// Build and validate a table from explicit edges.
    pub fn new(
        edges: impl IntoIterator<Item = (ResearchPhase, Outcome, Transition)>,
    ) -> Result<Self, DomainError> {
        let mut slots: [[Option<Transition>; 2]; 4] = [[None; 2]; 4];

        for (phase, outcome, transition) in edges {
            let slot = &mut slots[phase.index()][outcome.index()];
            if slot.is_some() {
                return Err(DomainError::DuplicateTransition {
                    phase: phase.as_str().to_string(),
                    outcome: outcome.to_string(),
                });
            }
            match (phase.is_terminal(), transition) {
                (true, Transition::To(_)) => {
                    return Err(DomainError::TerminalTransition(phase.as_str().to_string()));
                }
                (false, Transition::Finish) => {
                    return Err(DomainError::PrematureFinish(phase.as_str().to_string()));
                }
                _ => {}
            }
            *slot = Some(transition);
        }

        let mut table = [[Transition::Finish; 2]; 4];
        for phase in ResearchPhase::ALL {
            for outcome in Outcome::ALL {
                table[phase.index()][outcome.index()] = slots[phase.index()][outcome.index()]
                    .ok_or_else(|| DomainError::MissingTransition {
                        phase: phase.as_str().to_string(),
                        outcome: outcome.to_string(),
                    })?;
            }
        }

        Ok(Self { edges: table })
    }

    /// The plan → retrieve → assess loop with compose as the only exit.
    pub fn research_loop() -> Self {
        let mut edges = [[Transition::Finish; 2]; 4];
        for (phase, outcome, transition) in RESEARCH_LOOP_EDGES {
            edges[phase.index()][outcome.index()] = transition;
        }
        Self { edges }
    }

    pub fn next(&self, phase: ResearchPhase, outcome: Outcome) -> Transition {
        self.edges[phase.index()][outcome.index()]
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::research_loop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Outcome::*;
    use ResearchPhase::*;

    #[test]
    fn test_research_loop_passes_validation() {
        assert_eq!(
            TransitionTable::new(RESEARCH_LOOP_EDGES),
            Ok(TransitionTable::research_loop())
        );
    }

    #[test]
    fn test_research_loop_routes() {
        let table = TransitionTable::research_loop();
        assert_eq!(table.next(PlanQueries, Unsatisfied), Transition::To(Retrieve));
        assert_eq!(table.next(Retrieve, Unsatisfied), Transition::To(Assess));
        assert_eq!(table.next(Assess, Unsatisfied), Transition::To(PlanQueries));
        assert_eq!(table.next(Assess, Satisfied), Transition::To(Compose));
        assert_eq!(table.next(Compose, Satisfied), Transition::Finish);
    }

    #[test]
    fn test_assess_is_the_only_conditional_edge() {
        let table = TransitionTable::research_loop();
        for phase in ResearchPhase::ALL {
            let differs = table.next(phase, Satisfied) != table.next(phase, Unsatisfied);
            assert_eq!(differs, phase == Assess, "{phase:?}");
        }
    }

    #[test]
    fn test_missing_edge_is_rejected() {
        let edges = [
            (PlanQueries, Satisfied, Transition::To(Retrieve)),
            (PlanQueries, Unsatisfied, Transition::To(Retrieve)),
            (Retrieve, Satisfied, Transition::To(Assess)),
            (Retrieve, Unsatisfied, Transition::To(Assess)),
            (Assess, Satisfied, Transition::To(Compose)),
            (Compose, Satisfied, Transition::Finish),
            (Compose, Unsatisfied, Transition::Finish),
        ];
        let err = TransitionTable::new(edges).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingTransition {
                phase: "assess".to_string(),
                outcome: "unsatisfied".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_edge_is_rejected() {
        let edges = [
            (PlanQueries, Satisfied, Transition::To(Retrieve)),
            (PlanQueries, Satisfied, Transition::To(Assess)),
        ];
        assert!(matches!(
            TransitionTable::new(edges),
            Err(DomainError::DuplicateTransition { .. })
        ));
    }

    #[test]
    fn test_terminal_cannot_loop() {
        let edges = [(Compose, Satisfied, Transition::To(PlanQueries))];
        assert_eq!(
            TransitionTable::new(edges),
            Err(DomainError::TerminalTransition("compose".to_string()))
        );
    }

    #[test]
    fn test_non_terminal_cannot_finish() {
        let edges = [(Retrieve, Unsatisfied, Transition::Finish)];
        assert_eq!(
            TransitionTable::new(edges),
            Err(DomainError::PrematureFinish("retrieve".to_string()))
        );
    }
}
