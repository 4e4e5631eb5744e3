//! Built-in suites
//!
//! `backend` covers the whole REST surface with three fresh actors, `profile`
//! exercises the enhanced profile fields of a single long-lived account,
//! `matching` drives two actors through mutual matching and seeded feeds, and
//! `seed` populates and inspects the explore feeds.

use crate::payload::{
    Direction, Experience, Preferences, ProfileUpdate, ProjectEntry, RegisterRequest, SocialKind,
    SocialLink,
};
use crate::results::Category;
use crate::scenario::{Caller, Check, Feed, Scenario, Step, Suite, SwipeExpect, Target};
use crate::session::Method;
use serde_json::json;
use std::collections::BTreeMap;

/// Names of the built-in suites, in the order `list` prints them
pub const NAMES: [&str; 4] = ["backend", "profile", "matching", "seed"];

/// Look up a built-in suite by name
pub fn builtin(name: &str) -> Option<Suite> {
    match name {
        "backend" => Some(backend()),
        "profile" => Some(profile()),
        "matching" => Some(matching()),
        "seed" => Some(seed()),
        _ => None,
    }
}

pub fn names() -> &'static [&'static str] {
    &NAMES
}

fn actors(entries: &[(&str, &str, &str, &str)]) -> BTreeMap<String, RegisterRequest> {
    entries
        .iter()
        .map(|(actor, email, password, name)| {
            (actor.to_string(), RegisterRequest::new(email, password, name))
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn experience(title: &str, org: &str, start: &str, end: Option<&str>, description: &str) -> Experience {
    Experience {
        title: title.to_string(),
        org: Some(org.to_string()),
        start_date: Some(start.to_string()),
        end_date: end.map(str::to_string),
        description: Some(description.to_string()),
        ..Default::default()
    }
}

fn project(name: &str, description: &str, repo: &str, demo: &str) -> ProjectEntry {
    ProjectEntry {
        name: name.to_string(),
        description: Some(description.to_string()),
        repo_url: Some(repo.to_string()),
        demo_url: Some(demo.to_string()),
        tech: None,
    }
}

fn social(kind: SocialKind, url: &str) -> SocialLink {
    SocialLink {
        kind,
        url: url.to_string(),
    }
}

fn actor(name: &str) -> String {
    name.to_string()
}

fn swipe(who: &str, target: Target, direction: Direction, expect: SwipeExpect) -> Step {
    Step::Swipe {
        actor: actor(who),
        target,
        direction,
        expect,
        budget_ms: None,
    }
}

fn explore(who: &str, feed: Feed, min_items: usize, required: &[&str]) -> Step {
    Step::Explore {
        actor: actor(who),
        feed,
        min_items,
        required_fields: strings(required),
    }
}

fn anonymous(method: Method, path: &str, body: Option<serde_json::Value>, status: u16) -> Step {
    Step::Request {
        caller: Caller::Anonymous,
        method,
        path: path.to_string(),
        body,
        expect_status: status,
    }
}

fn backend() -> Suite {
    let alice_profile = ProfileUpdate {
        bio: Some(
            "Passionate full-stack developer with 5 years of experience in React and Node.js"
                .to_string(),
        ),
        looks_to_connect: Some(
            "Looking for innovative team members for hackathon projects".to_string(),
        ),
        skills: Some(strings(&["JavaScript", "React", "Node.js", "MongoDB", "Python"])),
        interests: Some(strings(&["AI/ML", "Web Development", "Mobile Apps", "Blockchain"])),
        experience: Some(vec![Experience {
            title: "Senior Developer".to_string(),
            company: Some("Tech Startup".to_string()),
            duration: Some("2 years".to_string()),
            ..Default::default()
        }]),
        projects: Some(vec![ProjectEntry {
            name: "E-commerce Platform".to_string(),
            description: Some("Built a full-stack e-commerce solution".to_string()),
            tech: Some(strings(&["React", "Node.js", "MongoDB"])),
            ..Default::default()
        }]),
        preferences: Some(Preferences {
            desired_roles: Some(strings(&["Frontend Developer", "Full-stack Developer"])),
            tech_stack: Some(strings(&["React", "Node.js"])),
            interest_tags: Some(strings(&["Web Development", "AI"])),
            location_radius_km: Some(50),
            remote_ok: Some(true),
            availability_hrs: Some(25),
            search_people: Some(true),
            search_projects: Some(true),
            search_hackathons: Some(true),
        }),
        ..Default::default()
    };

    let bob_profile = ProfileUpdate {
        bio: Some("Creative UI/UX designer passionate about user-centered design".to_string()),
        looks_to_connect: Some(
            "Seeking developers for collaborative hackathon projects".to_string(),
        ),
        skills: Some(strings(&["Figma", "Adobe Creative Suite", "HTML/CSS", "JavaScript"])),
        interests: Some(strings(&[
            "Design Systems",
            "User Experience",
            "Frontend Development",
        ])),
        preferences: Some(Preferences {
            desired_roles: Some(strings(&["UI/UX Designer", "Frontend Developer"])),
            tech_stack: Some(strings(&["React", "Vue.js"])),
            search_people: Some(true),
            search_projects: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };

    let charlie_profile = ProfileUpdate {
        bio: Some("Full-stack engineer with expertise in modern web technologies".to_string()),
        skills: Some(strings(&["Python", "Django", "React", "PostgreSQL"])),
        interests: Some(strings(&["Backend Development", "DevOps", "Cloud Computing"])),
        ..Default::default()
    };

    Suite {
        name: "backend".to_string(),
        description: "Registration, login, profiles, explore, swiping and matches with three fresh accounts"
            .to_string(),
        actors: actors(&[
            ("alice", "alice.developer.{run}@hackathon.com", "SecurePass123!", "Alice Developer"),
            ("bob", "bob.designer.{run}@hackathon.com", "SecurePass456!", "Bob Designer"),
            ("charlie", "charlie.fullstack.{run}@hackathon.com", "SecurePass789!", "Charlie Fullstack"),
        ]),
        setup: Vec::new(),
        scenarios: vec![
            Scenario::new(
                "User Registration",
                Category::Auth,
                vec![
                    Check::named(
                        "Valid Registration",
                        Step::Register {
                            actor: actor("alice"),
                            expect_status: 200,
                        },
                    ),
                    Check::named(
                        "Duplicate Registration Prevention",
                        Step::Register {
                            actor: actor("alice"),
                            expect_status: 400,
                        },
                    ),
                    Check::named(
                        "Missing Fields Validation",
                        anonymous(
                            Method::Post,
                            "/auth/register",
                            Some(json!({"email": "test@test.com"})),
                            400,
                        ),
                    ),
                    Check::named(
                        "Second User Registration",
                        Step::Register {
                            actor: actor("bob"),
                            expect_status: 200,
                        },
                    ),
                    Check::named(
                        "Third User Registration",
                        Step::Register {
                            actor: actor("charlie"),
                            expect_status: 200,
                        },
                    ),
                ],
            ),
            Scenario::new(
                "User Login",
                Category::Auth,
                vec![
                    Check::named(
                        "Valid Login",
                        Step::Login {
                            actor: actor("alice"),
                            email: None,
                            password: None,
                            expect_status: 200,
                        },
                    ),
                    Check::named(
                        "Invalid Credentials",
                        Step::Login {
                            actor: actor("alice"),
                            email: None,
                            password: Some("WrongPassword".to_string()),
                            expect_status: 401,
                        },
                    ),
                    Check::named(
                        "Non-existent User",
                        anonymous(
                            Method::Post,
                            "/auth/login",
                            Some(json!({"email": "nonexistent@test.com", "password": "password"})),
                            401,
                        ),
                    ),
                ],
            ),
            Scenario::new(
                "Get Current User",
                Category::Auth,
                vec![
                    Check::named(
                        "Get Current User - Valid Token",
                        Step::CurrentUser {
                            caller: Caller::Actor(actor("alice")),
                            expect_status: 200,
                            expect_profile: false,
                        },
                    ),
                    Check::named(
                        "Get Current User - Invalid Token",
                        Step::CurrentUser {
                            caller: Caller::Token("invalid_token".to_string()),
                            expect_status: 401,
                            expect_profile: false,
                        },
                    ),
                    Check::named(
                        "Get Current User - No Token",
                        Step::CurrentUser {
                            caller: Caller::Anonymous,
                            expect_status: 401,
                            expect_profile: false,
                        },
                    ),
                ],
            ),
            Scenario::new(
                "Logout",
                Category::Auth,
                vec![
                    Check::named("Logout", Step::Logout { actor: actor("alice") }),
                    Check::named(
                        "Login After Logout",
                        Step::Login {
                            actor: actor("alice"),
                            email: None,
                            password: None,
                            expect_status: 200,
                        },
                    ),
                ],
            ),
            Scenario::new(
                "Profile Management",
                Category::Profile,
                vec![
                    Check::named(
                        "Create Profile",
                        Step::UpdateProfile {
                            actor: actor("alice"),
                            profile: alice_profile,
                        },
                    ),
                    Check::named("Get Profile", Step::VerifyProfile { actor: actor("alice") }),
                    Check::named(
                        "Create Second Profile",
                        Step::UpdateProfile {
                            actor: actor("bob"),
                            profile: bob_profile,
                        },
                    ),
                    Check::named(
                        "Create Third Profile",
                        Step::UpdateProfile {
                            actor: actor("charlie"),
                            profile: charlie_profile,
                        },
                    ),
                ],
            ),
            Scenario::new(
                "Explore People",
                Category::Explore,
                vec![
                    Check::named(
                        "Get People to Swipe",
                        explore("alice", Feed::People, 0, &["id", "name"]),
                    ),
                    Check::named(
                        "Unauthenticated Access",
                        anonymous(Method::Get, "/explore/people", None, 401),
                    ),
                ],
            ),
            Scenario::new(
                "Swiping System",
                Category::Swipe,
                vec![
                    Check::named(
                        "Right Swipe",
                        swipe(
                            "alice",
                            Target::Actor(actor("bob")),
                            Direction::Right,
                            SwipeExpect::NoMatch,
                        ),
                    ),
                    Check::named(
                        "Duplicate Swipe Prevention",
                        swipe(
                            "alice",
                            Target::Actor(actor("bob")),
                            Direction::Right,
                            SwipeExpect::Duplicate,
                        ),
                    ),
                    Check::named(
                        "Left Swipe",
                        swipe(
                            "alice",
                            Target::Actor(actor("charlie")),
                            Direction::Left,
                            SwipeExpect::Recorded,
                        ),
                    ),
                    Check::named(
                        "Match Creation",
                        swipe(
                            "bob",
                            Target::Actor(actor("alice")),
                            Direction::Right,
                            SwipeExpect::Match,
                        ),
                    ),
                ],
            ),
            Scenario::new(
                "Matches Retrieval",
                Category::Matches,
                vec![
                    Check::named(
                        "Get Matches - User 1",
                        Step::Matches {
                            actor: actor("alice"),
                            with_actor: Some(actor("bob")),
                            min_count: 1,
                            required_fields: strings(&["id", "otherUser"]),
                        },
                    ),
                    Check::named(
                        "Get Matches - User 2",
                        Step::Matches {
                            actor: actor("bob"),
                            with_actor: Some(actor("alice")),
                            min_count: 1,
                            required_fields: Vec::new(),
                        },
                    ),
                    Check::named(
                        "Unauthenticated Matches Access",
                        anonymous(Method::Get, "/matches", None, 401),
                    ),
                ],
            ),
        ],
    }
}

fn profile() -> Suite {
    let enhanced = ProfileUpdate {
        bio: Some(
            "Senior Software Engineer with 8+ years of experience building scalable web applications and leading cross-functional teams."
                .to_string(),
        ),
        looks_to_connect: Some(
            "Seeking talented frontend developers and UX designers to build the next generation of developer tools"
                .to_string(),
        ),
        skills: Some(strings(&[
            "JavaScript",
            "TypeScript",
            "React",
            "Node.js",
            "Python",
            "PostgreSQL",
            "MongoDB",
            "AWS",
            "Docker",
            "Kubernetes",
            "GraphQL",
            "REST APIs",
            "System Design",
            "Microservices",
        ])),
        interests: Some(strings(&[
            "Web Development",
            "System Architecture",
            "Developer Tools",
            "EdTech",
            "Open Source",
            "Mentoring",
            "Tech Leadership",
        ])),
        experience: Some(vec![
            experience(
                "Senior Software Engineer",
                "TechCorp Inc",
                "2020-01-01",
                None,
                "Leading development of a microservices architecture serving 1M+ users.",
            ),
            experience(
                "Full Stack Developer",
                "StartupXYZ",
                "2018-06-01",
                Some("2019-12-01"),
                "Developed an MVP from scratch using React and Node.js.",
            ),
            experience(
                "Junior Developer",
                "WebSolutions Ltd",
                "2016-03-01",
                Some("2018-05-01"),
                "Built responsive web applications and contributed to open-source projects.",
            ),
        ]),
        projects: Some(vec![
            project(
                "DevTools Pro",
                "Developer productivity suite with code analysis and performance monitoring",
                "https://github.com/profiletest/devtools-pro",
                "https://devtools-pro.demo.com",
            ),
            project(
                "EduPlatform",
                "Interactive learning platform with real-time code execution and peer review",
                "https://github.com/profiletest/eduplatform",
                "https://eduplatform.demo.com",
            ),
        ]),
        socials: Some(vec![
            social(SocialKind::Linkedin, "https://linkedin.com/in/profiletestuser"),
            social(SocialKind::Github, "https://github.com/profiletestuser"),
            social(SocialKind::Twitter, "https://twitter.com/profiletestuser"),
        ]),
        awards: Some(strings(&[
            "Best Innovation Award 2023",
            "Top Contributor Open Source 2022",
        ])),
        preferences: Some(Preferences {
            desired_roles: Some(strings(&["Senior Engineer", "Tech Lead", "Architect"])),
            tech_stack: Some(strings(&["React", "Node.js", "Python", "AWS"])),
            interest_tags: Some(strings(&["Web Development", "System Design", "EdTech"])),
            location_radius_km: Some(100),
            remote_ok: Some(true),
            availability_hrs: Some(25),
            search_people: Some(true),
            search_projects: Some(true),
            search_hackathons: Some(true),
        }),
    };

    let additions = ProfileUpdate {
        looks_to_connect: Some(
            "Updated: Now seeking DevOps engineers and cloud architects for exciting new projects"
                .to_string(),
        ),
        skills: Some(strings(&["Terraform", "Jenkins", "Redis"])),
        interests: Some(strings(&["Cloud Architecture", "DevOps"])),
        experience: Some(vec![experience(
            "Technical Consultant",
            "CloudTech Solutions",
            "2024-01-01",
            None,
            "Providing cloud architecture consulting for enterprise clients",
        )]),
        projects: Some(vec![project(
            "CloudOps Dashboard",
            "Real-time monitoring dashboard for cloud infrastructure with automated alerting",
            "https://github.com/profiletest/cloudops-dashboard",
            "https://cloudops.demo.com",
        )]),
        socials: Some(vec![social(SocialKind::Website, "https://profiletestuser.dev")]),
        awards: Some(strings(&["Cloud Architecture Certification 2024"])),
        preferences: Some(Preferences {
            desired_roles: Some(strings(&["Senior Engineer", "Tech Lead", "Cloud Architect"])),
            tech_stack: Some(strings(&["React", "Node.js", "Python", "AWS", "Terraform"])),
            interest_tags: Some(strings(&["Web Development", "Cloud Architecture", "DevOps"])),
            location_radius_km: Some(150),
            remote_ok: Some(true),
            availability_hrs: Some(30),
            search_people: Some(true),
            search_projects: Some(true),
            search_hackathons: Some(true),
        }),
        ..Default::default()
    };

    Suite {
        name: "profile".to_string(),
        description: "Enhanced profile fields: creation, retrieval, update workflow, persistence and structure"
            .to_string(),
        actors: actors(&[(
            "tester",
            "profile.test.user@example.com",
            "testpass123",
            "Profile Test User",
        )]),
        setup: vec![actor("tester")],
        scenarios: vec![
            Scenario::new(
                "Enhanced Profile Creation",
                Category::Profile,
                vec![Check::named(
                    "Enhanced Profile Creation",
                    Step::UpdateProfile {
                        actor: actor("tester"),
                        profile: enhanced,
                    },
                )],
            ),
            Scenario::new(
                "Profile Retrieval via Auth/Me",
                Category::Profile,
                vec![Check::named(
                    "Profile Retrieval via Auth/Me",
                    Step::CurrentUser {
                        caller: Caller::Actor(actor("tester")),
                        expect_status: 200,
                        expect_profile: true,
                    },
                )],
            ),
            Scenario::new(
                "Profile Update Workflow",
                Category::Profile,
                vec![
                    Check::named(
                        "Profile Update",
                        Step::ExtendProfile {
                            actor: actor("tester"),
                            additions,
                        },
                    ),
                    Check::named(
                        "Updated Profile Round Trip",
                        Step::VerifyProfile { actor: actor("tester") },
                    ),
                ],
            ),
            Scenario::new(
                "Profile Data Persistence",
                Category::Profile,
                vec![Check::named(
                    "Profile Data Persistence",
                    Step::ProfileConsistency {
                        actor: actor("tester"),
                        reads: 3,
                    },
                )],
            ),
            Scenario::new(
                "Profile Structure Validation",
                Category::Profile,
                vec![Check::named(
                    "Structure",
                    Step::ProfileShape { actor: actor("tester") },
                )],
            ),
        ],
    }
}

fn matching() -> Suite {
    const PERSON_FIELDS: [&str; 4] = ["id", "name", "email", "imageUrl"];
    const POST_FIELDS: [&str; 4] = ["id", "title", "type", "skillsNeeded"];
    const MATCH_FIELDS: [&str; 4] = ["id", "aId", "bId", "context"];

    Suite {
        name: "matching".to_string(),
        description: "Mutual matching between two actors, seeded feed swipes, response times and data integrity"
            .to_string(),
        actors: actors(&[
            ("user1", "hackswipe.user1.{run}@test.com", "test123", "HackSwipe User One"),
            ("user2", "hackswipe.user2.{run}@test.com", "test123", "HackSwipe User Two"),
        ]),
        setup: vec![actor("user1"), actor("user2")],
        scenarios: vec![
            Scenario::new(
                "Core Endpoints",
                Category::Explore,
                vec![
                    Check::named("People Endpoint", explore("user1", Feed::People, 0, &[])),
                    Check::named("Projects Endpoint", explore("user1", Feed::Projects, 0, &[])),
                    Check::named(
                        "Hackathons Endpoint",
                        explore("user1", Feed::Hackathons, 0, &[]),
                    ),
                    Check::named(
                        "Matches Endpoint",
                        Step::Matches {
                            actor: actor("user1"),
                            with_actor: None,
                            min_count: 0,
                            required_fields: Vec::new(),
                        },
                    ),
                    Check::named(
                        "Auth Endpoint",
                        Step::CurrentUser {
                            caller: Caller::Actor(actor("user1")),
                            expect_status: 200,
                            expect_profile: false,
                        },
                    ),
                ],
            ),
            Scenario::new(
                "Mutual Matching",
                Category::Matches,
                vec![
                    Check::named(
                        "User 1 Right Swipe",
                        swipe(
                            "user1",
                            Target::Actor(actor("user2")),
                            Direction::Right,
                            SwipeExpect::NoMatch,
                        ),
                    ),
                    Check::named(
                        "Mutual Match Creation",
                        swipe(
                            "user2",
                            Target::Actor(actor("user1")),
                            Direction::Right,
                            SwipeExpect::Match,
                        ),
                    ),
                    Check::named(
                        "Match Visible to User 1",
                        Step::Matches {
                            actor: actor("user1"),
                            with_actor: Some(actor("user2")),
                            min_count: 1,
                            required_fields: Vec::new(),
                        },
                    ),
                    Check::named(
                        "Match Visible to User 2",
                        Step::Matches {
                            actor: actor("user2"),
                            with_actor: Some(actor("user1")),
                            min_count: 1,
                            required_fields: Vec::new(),
                        },
                    ),
                ],
            ),
            Scenario::new(
                "Feed Swipes",
                Category::Swipe,
                vec![
                    Check::named("Seed Feed Data", Step::SeedDummyData { actor: actor("user1") }),
                    Check::named("Load People Feed", explore("user1", Feed::People, 1, &[])),
                    Check::named(
                        "Right Swipe on Person",
                        swipe(
                            "user1",
                            Target::Explored {
                                feed: Feed::People,
                                index: 0,
                            },
                            Direction::Right,
                            SwipeExpect::Recorded,
                        ),
                    ),
                    Check::named(
                        "Duplicate Swipe Prevention",
                        swipe(
                            "user1",
                            Target::Explored {
                                feed: Feed::People,
                                index: 0,
                            },
                            Direction::Left,
                            SwipeExpect::Duplicate,
                        ),
                    ),
                    Check::named("Load Projects Feed", explore("user1", Feed::Projects, 1, &[])),
                    Check::named(
                        "Left Swipe on Project",
                        swipe(
                            "user1",
                            Target::Explored {
                                feed: Feed::Projects,
                                index: 0,
                            },
                            Direction::Left,
                            SwipeExpect::Recorded,
                        ),
                    ),
                ],
            ),
            Scenario::new(
                "Response Times",
                Category::Explore,
                vec![
                    Check::named(
                        "People Feed Response Time",
                        Step::Timing {
                            actor: actor("user1"),
                            path: "/explore/people".to_string(),
                            budget_ms: 300,
                        },
                    ),
                    Check::named(
                        "Projects Feed Response Time",
                        Step::Timing {
                            actor: actor("user1"),
                            path: "/explore/projects".to_string(),
                            budget_ms: 300,
                        },
                    ),
                    Check::named(
                        "Matches Refresh Time",
                        Step::Timing {
                            actor: actor("user1"),
                            path: "/matches".to_string(),
                            budget_ms: 500,
                        },
                    ),
                    Check::named("Refresh People Feed", explore("user1", Feed::People, 1, &[])),
                    Check::named(
                        "Rapid Swipe on Person",
                        Step::Swipe {
                            actor: actor("user1"),
                            target: Target::Explored {
                                feed: Feed::People,
                                index: 0,
                            },
                            direction: Direction::Left,
                            expect: SwipeExpect::Recorded,
                            budget_ms: Some(200),
                        },
                    ),
                ],
            ),
            Scenario::new(
                "Data Integrity",
                Category::Explore,
                vec![
                    Check::named(
                        "People Data Structure",
                        explore("user1", Feed::People, 1, &PERSON_FIELDS),
                    ),
                    Check::named(
                        "Projects Data Structure",
                        explore("user1", Feed::Projects, 1, &POST_FIELDS),
                    ),
                    Check::named(
                        "Hackathons Data Structure",
                        explore("user1", Feed::Hackathons, 1, &POST_FIELDS),
                    ),
                    Check::named(
                        "Matches Data Structure",
                        Step::Matches {
                            actor: actor("user1"),
                            with_actor: None,
                            min_count: 1,
                            required_fields: strings(&MATCH_FIELDS),
                        },
                    ),
                ],
            ),
        ],
    }
}

fn seed() -> Suite {
    Suite {
        name: "seed".to_string(),
        description: "Seed dummy data and inspect the people, projects and hackathons feeds"
            .to_string(),
        actors: actors(&[(
            "debug",
            "debug.user.{run}@example.com",
            "debugpass123",
            "Debug User {run}",
        )]),
        setup: vec![actor("debug")],
        scenarios: vec![
            Scenario::new(
                "Create Dummy Data",
                Category::Seed,
                vec![Check::named(
                    "Create Dummy Data",
                    Step::SeedDummyData { actor: actor("debug") },
                )],
            ),
            Scenario::new(
                "Inspect Feeds",
                Category::Explore,
                vec![
                    Check::named("People", explore("debug", Feed::People, 1, &["id", "name"])),
                    Check::named(
                        "Projects",
                        explore("debug", Feed::Projects, 1, &["id", "title"]),
                    ),
                    Check::named(
                        "Hackathons",
                        explore("debug", Feed::Hackathons, 1, &["id", "title"]),
                    ),
                ],
            ),
        ],
    }
}
