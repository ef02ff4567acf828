//! Multi-evaluator consensus: verdicts, the compensation policy, and the
//! synthesis rule that turns three independent verdicts into a single
//! approve/retry decision.

mod parsing;
mod policy;
mod synthesis;
mod verdict;

pub use parsing::{ParsedVerdict, parse_verdict_response};
pub use policy::CompensationRule;
pub use synthesis::{ConsensusResult, synthesize};
pub use verdict::{EvaluationVerdict, EvaluatorDomain};
