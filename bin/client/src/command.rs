//! Console command parsing.

use crate::error::CommandError;

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an account.
    SignUp {
        email: String,
        password: String,
        username: String,
    },
    /// Sign in.
    Login { email: String, password: String },
    /// Sign out.
    Logout,
    /// List other users.
    Users,
    /// List my groups.
    Groups,
    /// Toggle a user in the group selection.
    Select { email: String },
    /// Create a group from the selection.
    Group { name: String },
    /// Open the direct chat with a user.
    Dm { email: String },
    /// Open a group chat by id or name.
    Open { group: String },
    /// Send text to the open chat.
    Say { text: String },
    /// Send an image file to the open chat.
    Image { path: String },
    /// Leave the open chat.
    Close,
    /// Show the command list.
    Help,
    /// Exit.
    Quit,
}

/// Command list shown by `help`.
pub const HELP: &str = "\
signup <email> <password> <username>
login <email> <password>
logout
users
groups
select <email>
group <name>
dm <email>
open <group id or name>
say <text>
image <path>
close
help
quit";

impl Command {
    /// Returns the command word, for logging without arguments.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SignUp { .. } => "signup",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Users => "users",
            Self::Groups => "groups",
            Self::Select { .. } => "select",
            Self::Group { .. } => "group",
            Self::Dm { .. } => "dm",
            Self::Open { .. } => "open",
            Self::Say { .. } => "say",
            Self::Image { .. } => "image",
            Self::Close => "close",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }

    /// Parses a line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `Unknown` for unrecognized commands and `Usage` when
    /// arguments are missing.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match (word, args.as_slice()) {
            ("signup", [email, password, username]) => Self::SignUp {
                email: (*email).to_string(),
                password: (*password).to_string(),
                username: (*username).to_string(),
            },
            ("signup", _) => return usage("signup <email> <password> <username>"),
            ("login", [email, password]) => Self::Login {
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            ("login", _) => return usage("login <email> <password>"),
            ("logout", []) => Self::Logout,
            ("users", []) => Self::Users,
            ("groups", []) => Self::Groups,
            ("select", [email]) => Self::Select {
                email: (*email).to_string(),
            },
            ("select", _) => return usage("select <email>"),
            ("group", _) if !rest.is_empty() => Self::Group {
                name: rest.to_string(),
            },
            ("group", _) => return usage("group <name>"),
            ("dm", [email]) => Self::Dm {
                email: (*email).to_string(),
            },
            ("dm", _) => return usage("dm <email>"),
            ("open", _) if !rest.is_empty() => Self::Open {
                group: rest.to_string(),
            },
            ("open", _) => return usage("open <group id or name>"),
            ("say", _) if !rest.is_empty() => Self::Say {
                text: rest.to_string(),
            },
            ("say", _) => return usage("say <text>"),
            ("image", _) if !rest.is_empty() => Self::Image {
                path: rest.to_string(),
            },
            ("image", _) => return usage("image <path>"),
            ("close", []) => Self::Close,
            ("help", _) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            ("logout" | "users" | "groups" | "close" | "quit" | "exit", _) => {
                return Err(CommandError::Unknown {
                    command: line.to_string(),
                });
            }
            (other, _) => {
                return Err(CommandError::Unknown {
                    command: other.to_string(),
                });
            }
        };
        Ok(Some(command))
    }
}

fn usage(usage: &'static str) -> Result<Option<Command>, CommandError> {
    Err(CommandError::Usage { usage })
}
