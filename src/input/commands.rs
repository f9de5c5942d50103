pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "home",
        aliases: &["dash"],
        description: "Dashboard stats",
    },
    CommandDef {
        name: "tests",
        aliases: &["ts"],
        description: "Tests & services",
    },
    CommandDef {
        name: "registrations",
        aliases: &["regs", "labs"],
        description: "Lab registrations",
    },
    CommandDef {
        name: "parents",
        aliases: &["pa"],
        description: "Parent organizations",
    },
    CommandDef {
        name: "profile",
        aliases: &["me"],
        description: "Admin profile",
    },
    CommandDef {
        name: "refresh",
        aliases: &["r"],
        description: "Reload the current view",
    },
    CommandDef {
        name: "login",
        aliases: &[],
        description: "Sign in as admin",
    },
    CommandDef {
        name: "logout",
        aliases: &[],
        description: "End the session",
    },
    CommandDef {
        name: "quit",
        aliases: &["q"],
        description: "Quit labdesk",
    },
    CommandDef {
        name: "help",
        aliases: &["h"],
        description: "Show help",
    },
];

pub fn matching_commands(input: &str) -> Vec<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .filter(|cmd| {
            cmd.name.starts_with(&input_lower)
                || cmd.aliases.iter().any(|a| a.starts_with(&input_lower))
        })
        .collect()
}

/// Resolves a full command name or alias.
pub fn find_command(input: &str) -> Option<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .find(|cmd| cmd.name == input_lower || cmd.aliases.contains(&input_lower.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_commands() {
        assert_eq!(matching_commands("t").len(), 1);
        assert_eq!(matching_commands("t")[0].name, "tests");

        // registrations, refresh
        assert_eq!(matching_commands("r").len(), 2);
        assert_eq!(matching_commands("regs")[0].name, "registrations");

        assert_eq!(matching_commands("log").len(), 2);
        assert_eq!(matching_commands("p").len(), 2);

        assert!(matching_commands("xyz").is_empty());
    }

    #[test]
    fn find_command_needs_exact_match() {
        assert_eq!(find_command("labs").map(|c| c.name), Some("registrations"));
        assert_eq!(find_command("Q").map(|c| c.name), Some("quit"));
        assert!(find_command("reg").is_none());
    }
}
