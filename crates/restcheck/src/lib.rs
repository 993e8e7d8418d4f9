//! # restcheck - Contract Testing for CRUD HTTP Resources
//!
//! This crate validates the CRUD behavior of a remote HTTP resource through
//! declarative request/assertion scenarios. It is a thin layer above a
//! transport, not an HTTP client: scenarios describe what to send and what
//! must come back, and the harness sequences, asserts, and reports.
//!
//! ## Components
//!
//! - [`fixtures`] - Randomized, collision-free item fixtures with an
//!   injected randomness provider for deterministic replay
//! - [`spec`] - Immutable request specs, one constructor per verb
//! - [`matcher`] - Partial and exact-except structural JSON assertions
//! - [`scenario`] - Declarative scenarios and the CRUD lifecycle patterns
//! - [`runner`] - Sequential orchestration with per-scenario isolation
//! - [`report`] - Scoped run reporter with begin/record/end lifecycle
//! - [`transport`] - The consumed transport boundary and its reqwest
//!   implementation
//!
//! ## Resource Contract
//!
//! The harness drives a conventional items resource:
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | create | POST | `/items` |
//! | read | GET | `/items/{id}` |
//! | update | PUT | `/items/{id}` |
//! | delete | DELETE | `/items/{id}` |
//!
//! Success bodies carry `{id, type, isbn13, price, numberinstock}`; the
//! `id` is server-assigned and immutable after creation.
//!
//! ## Outcomes
//!
//! Every scenario ends in exactly one of three outcomes, and the
//! distinction between the last two is load-bearing: operators must be able
//! to tell "the API is broken" apart from "the API is unreachable".
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | `Passed` | Every step's expectations held |
//! | `Failed` | The resource answered but broke the contract |
//! | `Aborted` | Transport failure, timeout, or run cancellation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restcheck::{
//!     FixtureGenerator, HarnessConfig, HttpTransport, Runner, Scenario,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = HarnessConfig::from_env()?;
//!     restcheck::init_logging(&config.log_level);
//!
//!     let mut fixtures = FixtureGenerator::new();
//!     let draft = fixtures.item("book", 10.0..=100.0, 1..=50)?;
//!     let updated = draft.with_price(99.99);
//!
//!     let scenarios = vec![
//!         Scenario::create_and_verify("create and fetch", "/items", &draft),
//!         Scenario::create_and_mutate("update price", "/items", &draft, &updated),
//!         Scenario::create_and_destroy("delete and 404", "/items", &draft),
//!     ];
//!
//!     let runner = Runner::new(HttpTransport::from_config(&config)?);
//!     let summary = runner.run(&scenarios).await;
//!     println!("{summary}");
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod matcher;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod spec;
pub mod transport;

pub use config::{HarnessConfig, init_logging};
pub use context::ScenarioContext;
pub use error::{
    AssertionError, ContextError, GenerationError, HarnessError, HarnessResult, SpecError,
    TransportError,
};
pub use fixtures::{FixtureGenerator, ItemDraft};
pub use matcher::{MatchOptions, assert_status, match_exact, match_partial};
pub use report::{Outcome, RunReporter, RunSummary, ScenarioResult};
pub use runner::{Runner, ScenarioState};
pub use scenario::{Capture, Expectation, HttpStep, MatchMode, Scenario, Step, StepAction};
pub use spec::{Method, RequestSpec};
pub use transport::{HttpTransport, Transport, TransportResponse};
