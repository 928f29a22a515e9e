/// Command registry and reply formatters.
/// Lookup happens on the lowercased full input string, so multi-word
/// names ("sudo hire-me", "cat resume.txt") are registered verbatim.
/// Formatters close over the read-only portfolio snapshot; anything
/// that needs session state (game lifecycle, clearing, file exports)
/// comes back as an action for the session to perform.

use chrono::{DateTime, Local};

use crate::content::PortfolioData;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Help,
    Whoami,
    Skills,
    Projects,
    Education,
    Contact,
    SudoHireMe,
    CatResume,
    CatContact,
    Clear,
    Date,
    Ls,
    Pwd,
    Cv,
    Games,
    Hack,
}

/// What dispatch should do with a matched command.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Reply {
    /// One atomic output record (may span several visual rows).
    Text(String),
    /// Blocks revealed one by one by the typing scheduler.
    Typed(Vec<String>),
    /// Tear down any running game, then truncate the scrollback.
    Clear,
    /// Quit any running game, then launch a fresh one.
    LaunchGame,
    /// Best-effort silent file export.
    ExportCv,
    /// Run the intrusion theater sequence.
    RunSimulation,
}

/// `hack` is deliberately missing from the help text.
const REGISTRY: &[(&str, Command)] = &[
    ("help", Command::Help),
    ("whoami", Command::Whoami),
    ("skills", Command::Skills),
    ("projects", Command::Projects),
    ("education", Command::Education),
    ("contact", Command::Contact),
    ("sudo hire-me", Command::SudoHireMe),
    ("cat resume.txt", Command::CatResume),
    ("cat contact_info.json", Command::CatContact),
    ("clear", Command::Clear),
    ("cclear", Command::Clear),
    ("date", Command::Date),
    ("ls", Command::Ls),
    ("pwd", Command::Pwd),
    ("cv", Command::Cv),
    ("games", Command::Games),
    ("hack", Command::Hack),
];

/// Exact-match lookup; `key` must already be lowercased.
pub fn lookup(key: &str) -> Option<Command> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, cmd)| *cmd)
}

/// Resolve a command into its reply or action.
pub fn reply(cmd: Command, data: &PortfolioData, now: DateTime<Local>) -> Reply {
    match cmd {
        Command::Help => Reply::Text(help_text().to_string()),
        Command::Whoami => Reply::Text(whoami(data)),
        Command::Skills => Reply::Text(skills(data)),
        Command::Projects => Reply::Text(projects(data)),
        Command::Education => Reply::Text(education(data)),
        Command::Contact => Reply::Text(contact(data)),
        Command::SudoHireMe => Reply::Typed(hire_me()),
        Command::CatResume => Reply::Text(resume(data)),
        Command::CatContact => Reply::Text(contact_json(data)),
        Command::Date => Reply::Text(now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()),
        Command::Ls => Reply::Text(
            "resume.txt  contact_info.json  home  about  skills  projects  contact".to_string(),
        ),
        Command::Pwd => Reply::Text("/home/developer/portfolio".to_string()),
        Command::Clear => Reply::Clear,
        Command::Games => Reply::LaunchGame,
        Command::Cv => Reply::ExportCv,
        Command::Hack => Reply::RunSimulation,
    }
}

// ── Formatters ──

fn help_text() -> &'static str {
    "Available commands:\n  \
     help           - Show this help message\n  \
     whoami         - Display developer info\n  \
     skills         - List technical skills\n  \
     projects       - Show project portfolio\n  \
     education      - Display education & certifications\n  \
     contact        - Get contact information\n  \
     sudo hire-me   - Try to hire the developer ;)\n  \
     cat resume.txt - View resume summary\n  \
     cat contact_info.json - View contact details\n  \
     clear          - Clear terminal\n  \
     date           - Show current date/time\n  \
     ls             - List available sections\n  \
     pwd            - Print current directory\n  \
     cv             - Export CV (PDF)\n  \
     games          - Launch mini-arcade (Snake)"
}

/// Truncate to `width` chars, then pad with spaces to exactly `width`.
fn fit(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

fn whoami(data: &PortfolioData) -> String {
    let profile = data.profile.as_ref();
    let contact = data.contact_info.as_ref();
    let name = profile.and_then(|p| p.name.as_deref()).unwrap_or("Unknown");
    let role = profile.and_then(|p| p.role_main.as_deref()).unwrap_or("Developer");
    let location = contact.and_then(|c| c.location.as_deref()).unwrap_or("Unknown");
    let status = contact.and_then(|c| c.status.as_deref()).unwrap_or("N/A");

    let mut out = String::new();
    out.push_str("+-------------------------------------------+\n");
    out.push_str("|             DEVELOPER PROFILE             |\n");
    out.push_str("+-------------------------------------------+\n");
    for (label, value) in [
        ("Name:", name),
        ("Role:", role),
        ("Location:", location),
        ("Status:", status),
    ] {
        out.push_str(&format!("| {}{} |\n", fit(label, 11), fit(value, 30)));
    }
    out.push_str("+-------------------------------------------+");
    out
}

fn skills(data: &PortfolioData) -> String {
    let list = match &data.skills {
        Some(skills) => skills
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        None => "Loading...".to_string(),
    };
    format!("[TECHNICAL SKILLS LOADED]\n\n{list}")
}

fn projects(data: &PortfolioData) -> String {
    let list = match &data.projects {
        Some(projects) => projects
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}. {}", i + 1, p.title))
            .collect::<Vec<_>>()
            .join("\n"),
        None => "Loading...".to_string(),
    };
    format!("[PROJECTS DATABASE ACCESSED]\n\n{list}")
}

fn education(data: &PortfolioData) -> String {
    let entries = match &data.education {
        Some(entries) if !entries.is_empty() => entries,
        _ => return "No education data found.".to_string(),
    };
    let blocks = entries
        .iter()
        .map(|e| {
            let ongoing = if e.current { " (ongoing)" } else { "" };
            format!(
                "\n [{}]{}\n \u{1F393} {}\n \u{1F3DB}\u{FE0F}  {}\n \u{1F4DD} {}\n ---------------------------------------------------",
                e.period, ongoing, e.degree, e.institution, e.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("[EDUCATION DATABASE ACCESSED]\n{blocks}")
}

fn contact(data: &PortfolioData) -> String {
    let c = data.contact_info.as_ref();
    let email = c.and_then(|c| c.email.as_deref()).unwrap_or_default();
    let linkedin = c.and_then(|c| c.linkedin.as_deref()).unwrap_or_default();
    let github = c.and_then(|c| c.github.as_deref()).unwrap_or_default();
    format!(
        "[CONTACT INFORMATION]\n\n\u{1F4E7} Email:    {email}\n\u{1F4BC} LinkedIn: {linkedin}\n\u{1F419} GitHub:   {github}"
    )
}

fn hire_me() -> Vec<String> {
    vec![
        "[sudo] password for developer: ********".to_string(),
        "Verifying credentials...".to_string(),
        "\u{2554}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2557}\n\
         \u{2551}                                      \u{2551}\n\
         \u{2551}   \u{1F389} CONGRATULATIONS! \u{1F389}             \u{2551}\n\
         \u{2551}                                      \u{2551}\n\
         \u{2551}   ACCESS GRANTED                     \u{2551}\n\
         \u{2551}   HIRING PROTOCOL INITIATED          \u{2551}\n\
         \u{2551}                                      \u{2551}\n\
         \u{2551}   Let's build something amazing!     \u{2551}\n\
         \u{2551}                                      \u{2551}\n\
         \u{255A}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{255D}"
            .to_string(),
    ]
}

fn resume(data: &PortfolioData) -> String {
    let profile = data.profile.as_ref();
    let about = profile.and_then(|p| p.about.as_ref());
    let name = profile
        .and_then(|p| p.name.as_deref())
        .unwrap_or("Unknown")
        .to_uppercase();
    let role = profile.and_then(|p| p.role_main.as_deref()).unwrap_or("");
    let summary_a = format!(
        "{} {}",
        about.and_then(|a| a.summary_intro.as_deref()).unwrap_or(""),
        about.and_then(|a| a.summary_highlight1.as_deref()).unwrap_or(""),
    );
    let summary_b = format!(
        "{} {}",
        about.and_then(|a| a.summary_text1.as_deref()).unwrap_or(""),
        about.and_then(|a| a.summary_highlight2.as_deref()).unwrap_or(""),
    );

    let top = "\u{2554}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2557}";
    let rule = "\u{2560}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2563}";
    let bottom = "\u{255A}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{255D}";
    let row = |text: &str| format!("\u{2551}  {}  \u{2551}", fit(text, 39));

    [
        top.to_string(),
        row("          RESUME.TXT"),
        rule.to_string(),
        row(""),
        row(&name),
        row(role),
        row(""),
        row(summary_a.trim()),
        row(summary_b.trim()),
        row(""),
        row("PHILOSOPHY:"),
        row("\"Security is not a product,"),
        row(" but a process.\" - Bruce Schneier"),
        row(""),
        bottom.to_string(),
    ]
    .join("\n")
}

fn contact_json(data: &PortfolioData) -> String {
    let contact = data.contact_info.clone().unwrap_or_default();
    serde_json::to_string_pretty(&contact).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{About, ContactInfo, Education, Profile, Project, Skill};
    use chrono::TimeZone;

    fn sample_data() -> PortfolioData {
        PortfolioData {
            profile: Some(Profile {
                name: Some("Nadia Ferreira".into()),
                role_main: Some("Systems Engineer".into()),
                about: Some(About {
                    summary_intro: Some("I build".into()),
                    summary_highlight1: Some("resilient backends".into()),
                    summary_text1: Some("and poke at".into()),
                    summary_highlight2: Some("network protocols".into()),
                }),
            }),
            skills: Some(vec![
                Skill { name: "Rust".into(), ..Skill::default() },
                Skill { name: "Linux".into(), ..Skill::default() },
                Skill { name: "Wireshark".into(), ..Skill::default() },
            ]),
            projects: Some(vec![
                Project { title: "packetloom".into(), ..Project::default() },
                Project { title: "tracefold".into(), ..Project::default() },
            ]),
            education: Some(vec![
                Education {
                    period: "2021 - 2024".into(),
                    degree: "BSc Computer Science".into(),
                    institution: "State University".into(),
                    description: "Networks track".into(),
                    current: false,
                },
                Education {
                    period: "2024 - now".into(),
                    degree: "MSc Security".into(),
                    institution: "Tech Institute".into(),
                    description: "Thesis on fuzzing".into(),
                    current: true,
                },
            ]),
            contact_info: Some(ContactInfo {
                location: Some("Porto, PT".into()),
                email: Some("nadia@example.com".into()),
                status: Some("open to work".into()),
                linkedin: Some("linkedin.com/in/nadia".into()),
                github: Some("github.com/nadia".into()),
            }),
        }
    }

    #[test]
    fn lookup_handles_multiword_names() {
        assert_eq!(lookup("sudo hire-me"), Some(Command::SudoHireMe));
        assert_eq!(lookup("cat contact_info.json"), Some(Command::CatContact));
        assert_eq!(lookup("cclear"), Some(Command::Clear));
        assert_eq!(lookup("make-me-a-sandwich"), None);
    }

    #[test]
    fn help_lists_visible_commands_only() {
        let help = help_text();
        for (name, cmd) in REGISTRY {
            if matches!(cmd, Command::Hack) || *name == "cclear" {
                continue;
            }
            assert!(help.contains(name), "help is missing {name}");
        }
        assert!(!help.contains("hack"));
    }

    #[test]
    fn whoami_renders_data_and_aligned_borders() {
        let out = whoami(&sample_data());
        assert!(out.contains("Nadia Ferreira"));
        assert!(out.contains("Systems Engineer"));
        assert!(out.contains("Porto, PT"));
        for line in out.lines() {
            assert_eq!(line.chars().count(), 45, "ragged box line: {line:?}");
        }
    }

    #[test]
    fn whoami_falls_back_per_field() {
        let out = whoami(&PortfolioData::default());
        assert!(out.contains("Unknown"));
        assert!(out.contains("Developer"));
        assert!(out.contains("N/A"));
    }

    #[test]
    fn skills_joins_names() {
        assert_eq!(
            skills(&sample_data()),
            "[TECHNICAL SKILLS LOADED]\n\nRust, Linux, Wireshark"
        );
        assert_eq!(
            skills(&PortfolioData::default()),
            "[TECHNICAL SKILLS LOADED]\n\nLoading..."
        );
    }

    #[test]
    fn projects_are_numbered() {
        let out = projects(&sample_data());
        assert!(out.starts_with("[PROJECTS DATABASE ACCESSED]"));
        assert!(out.contains("1. packetloom"));
        assert!(out.contains("2. tracefold"));
    }

    #[test]
    fn education_blocks_and_ongoing_marker() {
        let out = education(&sample_data());
        assert!(out.contains("[2021 - 2024]"));
        assert!(out.contains("BSc Computer Science"));
        assert!(out.contains("[2024 - now] (ongoing)"));
        assert_eq!(
            education(&PortfolioData::default()),
            "No education data found."
        );
    }

    #[test]
    fn contact_lists_channels() {
        let out = contact(&sample_data());
        assert!(out.contains("Email:    nadia@example.com"));
        assert!(out.contains("LinkedIn: linkedin.com/in/nadia"));
        assert!(out.contains("GitHub:   github.com/nadia"));
        // Missing data renders empty, not a crash.
        let fallback = contact(&PortfolioData::default());
        assert!(fallback.contains("[CONTACT INFORMATION]"));
    }

    #[test]
    fn hire_me_is_a_three_block_sequence() {
        let blocks = hire_me();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains("password for developer"));
        assert_eq!(blocks[1], "Verifying credentials...");
        assert!(blocks[2].contains("ACCESS GRANTED"));
        assert!(blocks[2].contains("HIRING PROTOCOL INITIATED"));
    }

    #[test]
    fn resume_uppercases_name() {
        let out = resume(&sample_data());
        assert!(out.contains("NADIA FERREIRA"));
        assert!(out.contains("RESUME.TXT"));
        assert!(out.contains("I build resilient backends"));
    }

    #[test]
    fn resume_renders_missing_fields_as_blanks() {
        let out = resume(&PortfolioData::default());
        assert!(out.contains("UNKNOWN"));
        for line in out.lines() {
            assert_eq!(line.chars().count(), 45, "ragged box line: {line:?}");
        }
    }

    #[test]
    fn contact_json_is_pretty_and_total() {
        let out = contact_json(&sample_data());
        assert!(out.contains("\"email\": \"nadia@example.com\""));
        assert_eq!(contact_json(&PortfolioData::default()), "{}");
    }

    #[test]
    fn date_formats_like_a_js_date_string() {
        let now = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let Reply::Text(out) = reply(Command::Date, &PortfolioData::default(), now) else {
            panic!("date should reply with text");
        };
        assert!(out.starts_with("Fri Mar 14 2025 09:26:53 GMT"));
    }

    #[test]
    fn static_replies_are_verbatim() {
        let now = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let data = PortfolioData::default();
        assert_eq!(
            reply(Command::Ls, &data, now),
            Reply::Text(
                "resume.txt  contact_info.json  home  about  skills  projects  contact".into()
            )
        );
        assert_eq!(
            reply(Command::Pwd, &data, now),
            Reply::Text("/home/developer/portfolio".into())
        );
    }

    #[test]
    fn side_effecting_commands_become_actions() {
        let now = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let data = PortfolioData::default();
        assert_eq!(reply(Command::Clear, &data, now), Reply::Clear);
        assert_eq!(reply(Command::Games, &data, now), Reply::LaunchGame);
        assert_eq!(reply(Command::Cv, &data, now), Reply::ExportCv);
        assert_eq!(reply(Command::Hack, &data, now), Reply::RunSimulation);
    }
}
