//! Declarative scenarios and the standard CRUD lifecycle patterns.
//!
//! A [`Scenario`] is a named, ordered sequence of steps. Each step either
//! issues one HTTP call (request template, expectation, capture rules) or
//! checks distinctness of values captured by earlier steps. Scenarios are
//! plain data (serde-serializable), so suites can be defined in code or
//! loaded from JSON; nothing here dispatches through test-framework hooks.
//!
//! The four lifecycle patterns ship as constructors instead of copy-pasted
//! step lists:
//!
//! | Pattern | Steps |
//! |---------|-------|
//! | [`Scenario::create_and_verify`] | create → re-fetch by captured id |
//! | [`Scenario::create_and_mutate`] | create → update → assert echo |
//! | [`Scenario::create_and_destroy`] | create → delete → fetch expects 404 |
//! | [`Scenario::distinct_pair`] | create twice → ids and isbn13s differ |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fixtures::ItemDraft;
use crate::spec::Method;

/// A named, ordered sequence of request/assert steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, unique within a run for readable reports.
    pub name: String,

    /// The steps, executed strictly in order.
    pub steps: Vec<Step>,
}

/// One step of a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Step name, used in failure details.
    pub name: String,

    /// What the step does.
    #[serde(flatten)]
    pub action: StepAction,
}

/// The action a step performs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepAction {
    /// Issue an HTTP call and assert on the response.
    Http(HttpStep),
    /// Assert pairwise distinctness of captured values.
    Distinct(DistinctStep),
}

/// An HTTP call: request template, expectation, capture rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpStep {
    /// HTTP method.
    pub method: Method,

    /// Path template; `{key}` placeholders resolve against captured values.
    pub path: String,

    /// JSON body for POST/PUT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Expected response.
    pub expect: Expectation,

    /// Values to pull out of the response body for later steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capture: Vec<Capture>,
}

/// A distinctness check over captured values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistinctStep {
    /// Capture-key pairs that must hold different values.
    pub pairs: Vec<(String, String)>,
}

/// A capture rule: store the value at `path` in the response body under
/// `key` in the scenario context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capture {
    /// Context key to write (write-once per scenario).
    pub key: String,

    /// Dotted path into the response body.
    pub path: String,
}

impl Capture {
    /// Capture rule where the context key equals the body path.
    pub fn field(name: &str) -> Self {
        Self {
            key: name.to_string(),
            path: name.to_string(),
        }
    }

    /// Capture rule with an explicit context key.
    pub fn named(key: &str, path: &str) -> Self {
        Self {
            key: key.to_string(),
            path: path.to_string(),
        }
    }
}

/// Expected status and optional partial body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectation {
    /// Expected HTTP status code.
    pub status: u16,

    /// Expected JSON structure, compared per [`mode`](Self::mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Comparison mode for the body.
    #[serde(default)]
    pub mode: MatchMode,
}

impl Expectation {
    /// Expect only a status code, no body assertion.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: None,
            mode: MatchMode::Partial,
        }
    }

    /// Expect a status and a partial body match.
    pub fn partial(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
            mode: MatchMode::Partial,
        }
    }

    /// Expect a status and an exact body match apart from the named
    /// server-assigned fields.
    pub fn exact_except(status: u16, body: Value, ignore: &[&str]) -> Self {
        Self {
            status,
            body: Some(body),
            mode: MatchMode::Exact {
                ignore: ignore.iter().map(|s| s.to_string()).collect(),
            },
        }
    }
}

/// Body comparison mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Subset match; extra actual keys are ignored.
    #[default]
    Partial,

    /// Every actual key must be declared unless named in `ignore`.
    Exact {
        /// Server-assigned keys exempt from the exactness rule.
        #[serde(default)]
        ignore: Vec<String>,
    },
}

impl Scenario {
    /// Creates a scenario from explicit steps.
    pub fn new(name: &str, steps: Vec<Step>) -> Self {
        Self {
            name: name.to_string(),
            steps,
        }
    }

    /// Single-step scenario pinning known server state: GET `path`, expect
    /// `status` and, when given, a partial body match.
    pub fn read_expecting(name: &str, path: &str, status: u16, body: Option<Value>) -> Self {
        Self::new(
            name,
            vec![Step {
                name: "fetch".to_string(),
                action: StepAction::Http(HttpStep {
                    method: Method::Get,
                    path: path.to_string(),
                    body: None,
                    expect: Expectation {
                        status,
                        body,
                        mode: MatchMode::Partial,
                    },
                    capture: Vec::new(),
                }),
            }],
        )
    }

    /// Create → assert the echo matches the draft (apart from the assigned
    /// id) → re-fetch by captured id → assert the stored item matches too.
    pub fn create_and_verify(name: &str, collection: &str, draft: &ItemDraft) -> Self {
        Self::new(
            name,
            vec![
                create_step(collection, draft),
                Step {
                    name: "fetch".to_string(),
                    action: StepAction::Http(HttpStep {
                        method: Method::Get,
                        path: format!("{collection}/{{id}}"),
                        body: None,
                        expect: Expectation::exact_except(200, draft.to_json(), &["id"]),
                        capture: Vec::new(),
                    }),
                },
            ],
        )
    }

    /// Create → capture id → update → assert the echo reflects exactly the
    /// updated draft and nothing else changed.
    pub fn create_and_mutate(
        name: &str,
        collection: &str,
        draft: &ItemDraft,
        updated: &ItemDraft,
    ) -> Self {
        Self::new(
            name,
            vec![
                create_step(collection, draft),
                Step {
                    name: "update".to_string(),
                    action: StepAction::Http(HttpStep {
                        method: Method::Put,
                        path: format!("{collection}/{{id}}"),
                        body: Some(updated.to_json()),
                        expect: Expectation::exact_except(200, updated.to_json(), &["id"]),
                        capture: Vec::new(),
                    }),
                },
            ],
        )
    }

    /// Create → capture id → delete → re-fetch expects not-found.
    pub fn create_and_destroy(name: &str, collection: &str, draft: &ItemDraft) -> Self {
        Self::new(
            name,
            vec![
                create_step(collection, draft),
                Step {
                    name: "delete".to_string(),
                    action: StepAction::Http(HttpStep {
                        method: Method::Delete,
                        path: format!("{collection}/{{id}}"),
                        body: None,
                        expect: Expectation::status(200),
                        capture: Vec::new(),
                    }),
                },
                Step {
                    name: "fetch-after-delete".to_string(),
                    action: StepAction::Http(HttpStep {
                        method: Method::Get,
                        path: format!("{collection}/{{id}}"),
                        body: None,
                        expect: Expectation::status(404),
                        capture: Vec::new(),
                    }),
                },
            ],
        )
    }

    /// Create two items independently and assert both the assigned ids and
    /// the generated isbn13 values are pairwise distinct. Validates
    /// server-side id assignment and generator non-collision in one go.
    pub fn distinct_pair(
        name: &str,
        collection: &str,
        first: &ItemDraft,
        second: &ItemDraft,
    ) -> Self {
        Self::new(
            name,
            vec![
                Step {
                    name: "create-first".to_string(),
                    action: StepAction::Http(HttpStep {
                        method: Method::Post,
                        path: collection.to_string(),
                        body: Some(first.to_json()),
                        expect: Expectation::partial(201, first.to_json()),
                        capture: vec![
                            Capture::named("first_id", "id"),
                            Capture::named("first_isbn13", "isbn13"),
                        ],
                    }),
                },
                Step {
                    name: "create-second".to_string(),
                    action: StepAction::Http(HttpStep {
                        method: Method::Post,
                        path: collection.to_string(),
                        body: Some(second.to_json()),
                        expect: Expectation::partial(201, second.to_json()),
                        capture: vec![
                            Capture::named("second_id", "id"),
                            Capture::named("second_isbn13", "isbn13"),
                        ],
                    }),
                },
                Step {
                    name: "distinct".to_string(),
                    action: StepAction::Distinct(DistinctStep {
                        pairs: vec![
                            ("first_id".to_string(), "second_id".to_string()),
                            ("first_isbn13".to_string(), "second_isbn13".to_string()),
                        ],
                    }),
                },
            ],
        )
    }
}

fn create_step(collection: &str, draft: &ItemDraft) -> Step {
    Step {
        name: "create".to_string(),
        action: StepAction::Http(HttpStep {
            method: Method::Post,
            path: collection.to_string(),
            body: Some(draft.to_json()),
            expect: Expectation::exact_except(201, draft.to_json(), &["id"]),
            capture: vec![Capture::field("id")],
        }),
    }
}
