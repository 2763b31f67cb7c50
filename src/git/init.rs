use crate::config::Identity;

/// One step of repository preparation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitDirective {
    Init,
    /// `git config <key> <value>`. Best-effort entries only log on failure.
    Config {
        key: &'static str,
        value: String,
        required: bool,
    },
}

impl InitDirective {
    pub fn args(&self) -> Vec<&str> {
        match self {
            InitDirective::Init => vec!["init", "--quiet"],
            InitDirective::Config { key, value, .. } => vec!["config", *key, value.as_str()],
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            InitDirective::Init => true,
            InitDirective::Config { required, .. } => *required,
        }
    }
}

/// Directives that turn an empty directory into a repository ready for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitScript {
    directives: Vec<InitDirective>,
}

impl InitScript {
    pub fn for_identity(identity: &Identity) -> Self {
        let required = |key, value: &str| InitDirective::Config {
            key,
            value: value.to_string(),
            required: true,
        };
        let tuning = |key, value: &str| InitDirective::Config {
            key,
            value: value.to_string(),
            required: false,
        };
        Self {
            directives: vec![
                InitDirective::Init,
                required("user.name", &identity.name),
                required("user.email", &identity.email),
                tuning("commit.gpgsign", "false"),
                tuning("gc.auto", "0"),
                tuning("core.autocrlf", "false"),
                // keep global credential helpers from overriding later pushes
                tuning("credential.helper", ""),
            ],
        }
    }

    pub fn directives(&self) -> &[InitDirective] {
        &self.directives
    }
}
