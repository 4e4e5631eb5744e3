use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Value, json};
use swipecheck::config::HarnessConfig;
use swipecheck::payload::{Direction, ProfileUpdate, RegisterRequest, SwipeRequest, TargetType};
use swipecheck::results::Category;
use swipecheck::runner::Runner;
use swipecheck::scenario::{Caller, Check, Scenario as SuiteScenario, Step, Suite, SwipeExpect, Target};
use swipecheck::session::{Auth, AuthPath, Method, Session, TransportError};

use super::harness::{
    MockService, TestContext, closed_base_url, ensure, parse_json, write_file,
};

pub struct Scenario {
    pub name: &'static str,
    pub run: fn(&TestContext) -> Result<(), String>,
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "help_output",
            run: scenario_help,
        },
        Scenario {
            name: "no_args_error",
            run: scenario_no_args,
        },
        Scenario {
            name: "list_builtin_suites",
            run: scenario_list,
        },
        Scenario {
            name: "show_suite_json",
            run: scenario_show,
        },
        Scenario {
            name: "unknown_suite_fails_before_requests",
            run: scenario_unknown_suite,
        },
        Scenario {
            name: "authenticate_falls_back_to_login",
            run: scenario_authenticate_fallback,
        },
        Scenario {
            name: "non_2xx_is_a_value",
            run: scenario_non_2xx_is_a_value,
        },
        Scenario {
            name: "transport_error_on_closed_port",
            run: scenario_transport_error,
        },
        Scenario {
            name: "timeout_is_a_transport_error",
            run: scenario_timeout,
        },
        Scenario {
            name: "register_then_profile_round_trip",
            run: scenario_register_profile_example,
        },
        Scenario {
            name: "reciprocal_right_swipes_match",
            run: scenario_reciprocal_swipe_example,
        },
        Scenario {
            name: "duplicate_swipe_rejected_either_direction",
            run: scenario_duplicate_swipe,
        },
        Scenario {
            name: "protected_endpoints_require_token",
            run: scenario_unauthenticated_access,
        },
        Scenario {
            name: "runner_continues_past_failures",
            run: scenario_runner_continues,
        },
        Scenario {
            name: "transport_fault_mid_scenario",
            run: scenario_transport_fault_mid_scenario,
        },
        Scenario {
            name: "rejected_profile_update_is_not_verified",
            run: scenario_rejected_profile_update,
        },
        Scenario {
            name: "setup_failure_aborts_suite",
            run: scenario_setup_failure,
        },
        Scenario {
            name: "backend_suite_passes",
            run: scenario_backend_suite,
        },
        Scenario {
            name: "all_builtin_suites_json",
            run: scenario_all_suites_json,
        },
        Scenario {
            name: "suite_file_with_failures",
            run: scenario_suite_file_failures,
        },
        Scenario {
            name: "config_file_and_env_base_url",
            run: scenario_config_sources,
        },
    ]
}

fn scenario_help(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("help")?;
    let output = ctx.run_swipecheck(&env, &["--help"])?;
    output.assert_success()?;
    output.assert_stdout_contains("run")?;
    output.assert_stdout_contains("--base-url")?;
    Ok(())
}

fn scenario_no_args(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("no-args")?;
    let output = ctx.run_swipecheck(&env, &[])?;
    output.assert_failure()?;
    output.assert_stderr_contains("No command specified")?;
    Ok(())
}

fn scenario_list(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("list")?;
    let output = ctx.run_swipecheck(&env, &["list"])?;
    output.assert_success()?;
    for name in ["backend", "profile", "matching", "seed"] {
        output.assert_stdout_contains(name)?;
    }

    let output = ctx.run_swipecheck(&env, &["list", "--json"])?;
    output.assert_success()?;
    let listings = parse_json(&output.stdout)?;
    let listings = listings
        .as_array()
        .ok_or_else(|| "Expected a JSON array".to_string())?;
    ensure(listings.len() == 4, format!("Expected 4 suites, got {}", listings.len()))?;
    ensure(listings[0]["name"] == "backend", "backend should be listed first")?;
    Ok(())
}

fn scenario_show(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("show")?;
    let output = ctx.run_swipecheck(&env, &["show", "seed"])?;
    output.assert_success()?;
    let suite = parse_json(&output.stdout)?;
    ensure(suite["name"] == "seed", "Expected the seed suite")?;
    ensure(
        suite["scenarios"][0]["steps"][0]["kind"] == "seedDummyData",
        format!("Unexpected first step: {}", suite["scenarios"][0]["steps"][0]),
    )?;

    // The printed definition is itself a loadable suite file
    let path = env.root.join("seed.json");
    write_file(&path, &output.stdout)?;
    let output = ctx.run_swipecheck(&env, &["show", path.to_str().unwrap_or_default()])?;
    output.assert_success()?;
    Ok(())
}

fn scenario_unknown_suite(ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let env = ctx.create_env("unknown-suite")?;
    let output = ctx.run_swipecheck(
        &env,
        &["run", "backend", "nightly", "--base-url", &mock.base_url],
    )?;
    output.assert_failure()?;
    output.assert_stderr_contains("Unknown suite 'nightly'")?;
    ensure(
        mock.request_count() == 0,
        format!("Expected no requests, got {}", mock.request_count()),
    )?;
    Ok(())
}

fn scenario_authenticate_fallback(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let creds = RegisterRequest::new("a@test.com", "p1", "A");

    let mut first = Session::new(&mock.base_url, Duration::from_secs(5));
    let path = first.authenticate(&creds).map_err(|e| e.to_string())?;
    ensure(path == AuthPath::Registered, format!("First call: {:?}", path))?;

    for _ in 0..2 {
        let mut again = Session::new(&mock.base_url, Duration::from_secs(5));
        let path = again.authenticate(&creds).map_err(|e| e.to_string())?;
        ensure(path == AuthPath::LoggedIn, format!("Repeat call: {:?}", path))?;
        ensure(again.is_authenticated(), "Token not stored after login")?;
        ensure(
            again.user_id() == first.user_id(),
            "Login returned a different user",
        )?;
    }

    // A pre-existing account with a different password is an AuthError, not a retry loop
    mock.seed_user("taken@test.com", "other", "Taken");
    let mut session = Session::new(&mock.base_url, Duration::from_secs(5));
    let err = session
        .authenticate(&RegisterRequest::new("taken@test.com", "p1", "T"))
        .err()
        .ok_or_else(|| "Expected login failure".to_string())?;
    ensure(
        err.to_string().contains("status 401"),
        format!("Unexpected error: {}", err),
    )?;
    Ok(())
}

fn scenario_non_2xx_is_a_value(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let session = Session::new(&mock.base_url, Duration::from_secs(5));
    let outcome = session
        .request(Method::Get, "/matches", None)
        .map_err(|e| e.to_string())?;
    ensure(outcome.status == 401, format!("Got {}", outcome.status))?;
    ensure(
        outcome.error.as_deref() == Some("Unauthorized"),
        format!("Error message not parsed: {:?}", outcome.error),
    )?;
    Ok(())
}

fn scenario_transport_error(_ctx: &TestContext) -> Result<(), String> {
    let base_url = closed_base_url()?;
    let session = Session::new(&base_url, Duration::from_secs(2));
    match session.request(Method::Get, "/auth/me", None) {
        Err(TransportError::Connection { .. }) => Ok(()),
        Err(other) => Err(format!("Expected a connection error, got {}", other)),
        Ok(outcome) => Err(format!("Expected an error, got status {}", outcome.status)),
    }
}

fn scenario_timeout(_ctx: &TestContext) -> Result<(), String> {
    // Accepts connections at the TCP level but never answers
    let listener = std::net::TcpListener::bind("127.0.0.1:0").map_err(|e| e.to_string())?;
    let addr = listener.local_addr().map_err(|e| e.to_string())?;
    let session = Session::new(&format!("http://{}/api", addr), Duration::from_secs(1));

    let result = session.request(Method::Get, "/profile", None);
    drop(listener);
    match result {
        Err(TransportError::Timeout { secs: 1, .. }) => Ok(()),
        Err(other) => Err(format!("Expected a timeout, got {}", other)),
        Ok(outcome) => Err(format!("Expected a timeout, got status {}", outcome.status)),
    }
}

fn scenario_register_profile_example(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let mut session = Session::new(&mock.base_url, Duration::from_secs(5));

    let register = session
        .request_as(
            Method::Post,
            "/auth/register",
            Some(&json!({"email": "a@test.com", "password": "p1", "name": "A"})),
            Auth::Anonymous,
        )
        .map_err(|e| e.to_string())?;
    ensure(register.status == 200, format!("Register: {}", register.describe()))?;
    ensure(session.attach(&register), "Register response had no token")?;

    let update = session
        .request(Method::Put, "/profile", Some(&json!({"bio": "x"})))
        .map_err(|e| e.to_string())?;
    ensure(update.status == 200, format!("PUT: {}", update.describe()))?;
    ensure(update.body["profile"]["bio"] == "x", "PUT did not echo bio")?;

    let read = session
        .request(Method::Get, "/profile", None)
        .map_err(|e| e.to_string())?;
    ensure(read.status == 200, format!("GET: {}", read.describe()))?;
    ensure(read.body["profile"]["bio"] == "x", "GET did not return bio")?;
    Ok(())
}

fn two_actor_suite(scenarios: Vec<SuiteScenario>) -> Suite {
    let mut actors = BTreeMap::new();
    actors.insert("a".to_string(), RegisterRequest::new("a@test.com", "p1", "A"));
    actors.insert("b".to_string(), RegisterRequest::new("b@test.com", "p2", "B"));
    Suite {
        name: "two-actors".to_string(),
        description: String::new(),
        actors,
        setup: vec!["a".to_string(), "b".to_string()],
        scenarios,
    }
}

fn swipe_step(actor: &str, target: &str, expect: SwipeExpect) -> Check {
    Check::from(Step::Swipe {
        actor: actor.to_string(),
        target: Target::Actor(target.to_string()),
        direction: Direction::Right,
        expect,
        budget_ms: None,
    })
}

fn scenario_reciprocal_swipe_example(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let suite = two_actor_suite(vec![
        SuiteScenario::new(
            "Mutual match",
            Category::Swipe,
            vec![
                swipe_step("a", "b", SwipeExpect::NoMatch),
                swipe_step("b", "a", SwipeExpect::Match),
            ],
        ),
        SuiteScenario::new(
            "Both see the match",
            Category::Matches,
            vec![
                Check::from(Step::Matches {
                    actor: "a".to_string(),
                    with_actor: Some("b".to_string()),
                    min_count: 1,
                    required_fields: vec!["id".to_string()],
                }),
                Check::from(Step::Matches {
                    actor: "b".to_string(),
                    with_actor: Some("a".to_string()),
                    min_count: 1,
                    required_fields: Vec::new(),
                }),
            ],
        ),
    ]);

    let mut runner = Runner::new(HarnessConfig::new(&mock.base_url));
    let all_passed = runner.run(&suite).map_err(|e| e.to_string())?;
    let log = runner.log();
    let failures: Vec<String> = log
        .failures()
        .map(|r| format!("{}: {}", r.name, r.message))
        .collect();
    ensure(all_passed, format!("Failures: {:?}", failures))?;
    ensure(log.counts(Category::Setup).passed == 2, "Expected two setup results")?;
    ensure(log.counts(Category::Swipe).passed == 2, "Expected two swipe results")?;
    ensure(log.counts(Category::Matches).passed == 2, "Expected two match results")?;
    Ok(())
}

fn scenario_duplicate_swipe(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let mut a = Session::new(&mock.base_url, Duration::from_secs(5));
    let mut b = Session::new(&mock.base_url, Duration::from_secs(5));
    a.authenticate(&RegisterRequest::new("a@test.com", "p1", "A"))
        .map_err(|e| e.to_string())?;
    b.authenticate(&RegisterRequest::new("b@test.com", "p2", "B"))
        .map_err(|e| e.to_string())?;
    let target = b.user_id().ok_or("b has no id")?.to_string();

    let mut statuses = Vec::new();
    for direction in [Direction::Left, Direction::Right, Direction::Left] {
        let body = SwipeRequest {
            target_type: TargetType::Person,
            target_id: target.clone(),
            direction,
        }
        .to_json();
        let outcome = a
            .request(Method::Post, "/swipe", Some(&body))
            .map_err(|e| e.to_string())?;
        statuses.push(outcome.status);
    }
    ensure(
        statuses == vec![200, 400, 400],
        format!("Unexpected statuses {:?}", statuses),
    )?;
    Ok(())
}

fn scenario_unauthenticated_access(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let endpoints = [
        (Method::Get, "/auth/me"),
        (Method::Post, "/auth/logout"),
        (Method::Get, "/profile"),
        (Method::Put, "/profile"),
        (Method::Get, "/explore/people"),
        (Method::Get, "/explore/projects"),
        (Method::Get, "/explore/hackathons"),
        (Method::Post, "/swipe"),
        (Method::Get, "/matches"),
        (Method::Post, "/dummy-data"),
    ];

    let steps: Vec<Check> = endpoints
        .iter()
        .flat_map(|(method, path)| {
            [Caller::Anonymous, Caller::Token("invalid_token".to_string())]
                .into_iter()
                .map(move |caller| {
                    Check::from(Step::Request {
                        caller,
                        method: *method,
                        path: path.to_string(),
                        body: None,
                        expect_status: 401,
                    })
                })
        })
        .collect();
    let suite = two_actor_suite(vec![SuiteScenario::new(
        "Unauthenticated access",
        Category::Auth,
        steps,
    )]);

    let mut runner = Runner::new(HarnessConfig::new(&mock.base_url));
    ensure(
        runner.run(&suite).map_err(|e| e.to_string())?,
        "Some protected endpoint did not answer 401",
    )?;
    ensure(
        runner.log().counts(Category::Auth).passed == endpoints.len() * 2,
        "Expected one result per endpoint and caller",
    )?;
    Ok(())
}

fn scenario_runner_continues(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let suite = two_actor_suite(vec![
        SuiteScenario::new(
            "Wrong expectation",
            Category::Matches,
            vec![Check::named(
                "Anonymous matches",
                Step::Request {
                    caller: Caller::Anonymous,
                    method: Method::Get,
                    path: "/matches".to_string(),
                    body: None,
                    expect_status: 200,
                },
            )],
        ),
        SuiteScenario::new(
            "Missing dependency",
            Category::Profile,
            vec![Check::from(Step::VerifyProfile {
                actor: "a".to_string(),
            })],
        ),
        SuiteScenario::new(
            "Still runs",
            Category::Profile,
            vec![
                Check::from(Step::UpdateProfile {
                    actor: "a".to_string(),
                    profile: ProfileUpdate {
                        bio: Some("x".to_string()),
                        ..Default::default()
                    },
                }),
                Check::from(Step::VerifyProfile {
                    actor: "a".to_string(),
                }),
            ],
        ),
    ]);

    let mut runner = Runner::new(HarnessConfig::new(&mock.base_url));
    let all_passed = runner.run(&suite).map_err(|e| e.to_string())?;
    ensure(!all_passed, "Run should report failures")?;

    let results = runner.log().results();
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    ensure(
        names
            == vec![
                "Setup a",
                "Setup b",
                "Anonymous matches",
                "Missing dependency",
                "Update profile of a",
                "Verify profile of a - GET /profile",
                "Verify profile of a - GET /auth/me",
            ],
        format!("Unexpected results: {:?}", names),
    )?;
    ensure(!results[2].passed && !results[3].passed, "First two scenarios should fail")?;
    ensure(
        results[3].message.contains("has not written a profile"),
        format!("Fault not described: {}", results[3].message),
    )?;
    ensure(results[4..].iter().all(|r| r.passed), "Later scenario should pass")?;
    Ok(())
}

fn scenario_transport_fault_mid_scenario(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    // Both setup registrations are answered, nothing after them
    mock.stall_after(2);

    let suite = two_actor_suite(vec![
        SuiteScenario::new(
            "Stalled read",
            Category::Profile,
            vec![Check::from(Step::ProfileShape {
                actor: "a".to_string(),
            })],
        ),
        SuiteScenario::new(
            "Next",
            Category::Matches,
            vec![Check::from(Step::Request {
                caller: Caller::Anonymous,
                method: Method::Get,
                path: "/matches".to_string(),
                body: None,
                expect_status: 401,
            })],
        ),
    ]);

    let mut config = HarnessConfig::new(&mock.base_url);
    config.timeout = Duration::from_secs(1);
    let mut runner = Runner::new(config);
    let all_passed = runner.run(&suite).map_err(|e| e.to_string())?;
    ensure(!all_passed, "A stalled service cannot pass")?;

    let results = runner.log().results();
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    ensure(
        names == vec!["Setup a", "Setup b", "Stalled read", "Next"],
        format!("Unexpected results: {:?}", names),
    )?;
    let stalled = &results[2];
    ensure(!stalled.passed, "Timed out step should fail")?;
    ensure(
        stalled.message.contains("timed out") || stalled.message.contains("failed"),
        format!("Transport fault not described: {}", stalled.message),
    )?;
    ensure(
        results[3].category == Category::Matches,
        "Next scenario should record under its own category",
    )?;
    Ok(())
}

fn scenario_rejected_profile_update(_ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let suite = two_actor_suite(vec![
        SuiteScenario::new(
            "Oversized bio",
            Category::Profile,
            vec![Check::from(Step::UpdateProfile {
                actor: "a".to_string(),
                profile: ProfileUpdate {
                    bio: Some("x".repeat(600)),
                    ..Default::default()
                },
            })],
        ),
        SuiteScenario::new(
            "Verify",
            Category::Profile,
            vec![Check::from(Step::VerifyProfile {
                actor: "a".to_string(),
            })],
        ),
    ]);

    let mut runner = Runner::new(HarnessConfig::new(&mock.base_url));
    ensure(
        !runner.run(&suite).map_err(|e| e.to_string())?,
        "Rejected update should fail the run",
    )?;

    let results = runner.log().results();
    ensure(results.len() == 4, format!("Expected 4 results, got {}", results.len()))?;
    ensure(
        results[2].message.contains("got status 400"),
        format!("Update result: {}", results[2].message),
    )?;
    ensure(
        results[3].name == "Verify" && results[3].message.contains("has not written a profile"),
        format!("Verify compared against a rejected profile: {}", results[3].message),
    )?;
    Ok(())
}

fn scenario_setup_failure(ctx: &TestContext) -> Result<(), String> {
    let base_url = closed_base_url()?;
    let env = ctx.create_env("setup-failure")?;
    let output = ctx.run_swipecheck(
        &env,
        &["run", "profile", "--base-url", &base_url, "--timeout", "2"],
    )?;
    output.assert_failure()?;
    output.assert_stdout_contains("Setup failed for actor 'tester'")?;
    output.assert_stdout_contains("Remaining scenarios skipped")?;

    let output = ctx.run_swipecheck(
        &env,
        &["run", "profile", "--base-url", &base_url, "--timeout", "2", "--json"],
    )?;
    output.assert_failure()?;
    let reports = parse_json(&output.stdout)?;
    let report = &reports[0];
    ensure(report["aborted"].is_string(), "Report should carry the abort reason")?;
    let results = report["results"]
        .as_array()
        .ok_or_else(|| "results should be an array".to_string())?;
    ensure(results.len() == 1, format!("Expected one result, got {}", results.len()))?;
    ensure(results[0]["category"] == "setup", "Only the setup result is recorded")?;
    Ok(())
}

fn scenario_backend_suite(ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let env = ctx.create_env("backend")?;
    let output = ctx.run_swipecheck(&env, &["run", "--base-url", &mock.base_url])?;
    output.assert_success()?;
    output.assert_stdout_contains("=== User Registration ===")?;
    output.assert_stdout_contains("PASS: Match Creation - Match created")?;
    output.assert_stdout_contains("PASS: Logout - token revoked")?;
    output.assert_stdout_contains("TOTAL:")?;
    output.assert_stdout_contains("All checks passed.")?;
    Ok(())
}

fn scenario_all_suites_json(ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let env = ctx.create_env("all-suites")?;
    let output = ctx.run_swipecheck(
        &env,
        &[
            "run",
            "backend",
            "profile",
            "matching",
            "seed",
            "--base-url",
            &mock.base_url,
            "--json",
        ],
    )?;

    let reports = parse_json(&output.stdout)?;
    let reports = reports
        .as_array()
        .ok_or_else(|| format!("Expected an array, got: {}", output.stdout))?;
    ensure(reports.len() == 4, format!("Expected 4 reports, got {}", reports.len()))?;

    for report in reports {
        let failures: Vec<&Value> = report["results"]
            .as_array()
            .map(|r| r.iter().filter(|r| r["passed"] == false).collect())
            .unwrap_or_default();
        ensure(
            report["summary"]["all_passed"] == true,
            format!("Suite {} failed: {:?}", report["suite"], failures),
        )?;
    }

    let swipe_timing = reports
        .iter()
        .filter(|r| r["suite"] == "matching")
        .flat_map(|r| r["results"].as_array().cloned().unwrap_or_default())
        .find(|r| r["name"] == "Rapid Swipe on Person - response time")
        .ok_or_else(|| "matching suite did not time a swipe".to_string())?;
    ensure(
        swipe_timing["message"]
            .as_str()
            .is_some_and(|m| m.ends_with("within 200ms budget")),
        format!("Swipe timing: {}", swipe_timing),
    )?;
    output.assert_success()?;
    Ok(())
}

fn scenario_suite_file_failures(ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;
    let env = ctx.create_env("suite-file")?;
    let path = env.root.join("custom.yaml");
    write_file(
        &path,
        r#"
name: custom
actors:
  a: { email: "a.{run}@test.com", password: p1, name: A }
setup: [a]
scenarios:
  - name: Ghost actor
    category: swipe
    steps:
      - kind: swipe
        actor: ghost
        target: { actor: a }
        direction: RIGHT
        expect: recorded
  - name: Profile
    category: profile
    steps:
      - kind: updateProfile
        actor: a
        profile: { bio: "x", skills: ["Rust"] }
      - kind: verifyProfile
        actor: a
"#,
    )?;

    let output = ctx.run_swipecheck(
        &env,
        &[
            "run",
            path.to_str().unwrap_or_default(),
            "--base-url",
            &mock.base_url,
            "--json",
        ],
    )?;
    output.assert_failure()?;

    let reports = parse_json(&output.stdout)?;
    let summary = &reports[0]["summary"];
    ensure(summary["total_failed"] == 1, format!("Summary: {}", summary))?;
    ensure(summary["total_passed"] == 4, format!("Summary: {}", summary))?;
    let ghost = &reports[0]["results"][1];
    ensure(ghost["name"] == "Ghost actor", format!("Fault result: {}", ghost))?;
    ensure(
        ghost["message"]
            .as_str()
            .is_some_and(|m| m.contains("Unknown actor 'ghost'")),
        format!("Fault result: {}", ghost),
    )?;
    Ok(())
}

fn scenario_config_sources(ctx: &TestContext) -> Result<(), String> {
    let mock = MockService::start()?;

    let env = ctx.create_env("config-file")?;
    write_file(
        &env.xdg_config.join("swipecheck").join("config.json"),
        &json!({"base_url": mock.base_url, "timeout_secs": 5}).to_string(),
    )?;
    let output = ctx.run_swipecheck(&env, &["run", "seed"])?;
    output.assert_success()?;

    let env = ctx.create_env("config-env")?;
    let output = ctx.run_swipecheck_with_env(
        &env,
        &["run", "seed"],
        &[("SWIPECHECK_BASE_URL", mock.base_url.as_str())],
    )?;
    output.assert_success()?;

    // The flag wins over the environment
    let closed = closed_base_url()?;
    let output = ctx.run_swipecheck_with_env(
        &env,
        &["run", "seed", "--base-url", &closed, "--timeout", "2"],
        &[("SWIPECHECK_BASE_URL", mock.base_url.as_str())],
    )?;
    output.assert_failure()?;

    let output = ctx.run_swipecheck(&env, &["run", "seed", "--config", "/nonexistent/config.json"])?;
    output.assert_failure()?;
    output.assert_stderr_contains("Failed to read config file")?;
    Ok(())
}
