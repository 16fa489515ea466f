use dirs;
use errors::*;
use ini::Ini;
use ini::ParseOption;
use ini::Properties;
use std::path::Path;
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = ".aws-vpn.cfg";
const DEFAULT_SECTION: &str = "DEFAULT";

/// Process-wide settings, resolved once at startup and passed down from
/// there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub config_path: PathBuf,
}

impl Environment {
    pub fn new(config_path: Option<PathBuf>) -> Result<Environment> {
        let config_path = match config_path {
            Some(path) => path,
            None => dirs::home_dir()
                .ok_or_else(|| {
                    Error::from(ErrorKind::Config(
                        "could not determine the home directory".to_owned(),
                    ))
                })?
                .join(CONFIG_FILE_NAME),
        };
        Ok(Environment { config_path })
    }
}

/// The endpoint/subnet pair an invocation works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub section: String,
    pub endpoint_id: String,
    pub subnet_id: String,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub internet_access: bool,
}

pub fn load_target(env: &Environment, section: &str, profile: Option<&str>) -> Result<Target> {
    let ini = read(&env.config_path)?;
    let target = resolve(&ini, section, profile).map_err(|e| {
        let located = match *e.kind() {
            ErrorKind::Config(ref msg) => Some(format!("{}: {}", env.config_path.display(), msg)),
            _ => None,
        };
        match located {
            Some(msg) => Error::from(ErrorKind::Config(msg)),
            None => e,
        }
    })?;
    debug!("Resolved target: {:?}", target);
    Ok(target)
}

fn read(path: &Path) -> Result<Ini> {
    let opt = ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    };
    Ini::load_from_file_opt(path, opt)
        .chain_err(|| ErrorKind::Config(format!("could not read {}", path.display())))
}

fn resolve(ini: &Ini, section: &str, profile: Option<&str>) -> Result<Target> {
    let props = ini
        .section(Some(section))
        .ok_or_else(|| Error::from(ErrorKind::Config(format!("no section [{}]", section))))?;
    let lookup = Lookup {
        section,
        props,
        defaults: ini.section(Some(DEFAULT_SECTION)),
    };

    let endpoint_id = lookup.required("endpoint-id")?;
    let subnet_id = lookup.required("subnet-id")?;
    let internet_access = match lookup.optional("internet-access") {
        Some(value) => parse_bool(value).ok_or_else(|| {
            Error::from(ErrorKind::Config(format!(
                "[{}] internet-access is not a boolean: {}",
                section, value
            )))
        })?,
        None => false,
    };

    Ok(Target {
        section: section.to_owned(),
        endpoint_id: endpoint_id.to_owned(),
        subnet_id: subnet_id.to_owned(),
        region: lookup.optional("region").map(str::to_owned),
        profile: profile
            .or_else(|| lookup.optional("profile"))
            .map(str::to_owned),
        internet_access,
    })
}

struct Lookup<'a> {
    section: &'a str,
    props: &'a Properties,
    defaults: Option<&'a Properties>,
}

impl<'a> Lookup<'a> {
    fn optional(&self, key: &str) -> Option<&'a str> {
        get(self.props, key)
            .or_else(|| self.defaults.and_then(|d| get(d, key)))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<&'a str> {
        self.optional(key).ok_or_else(|| {
            ErrorKind::Config(format!("[{}] is missing required key {}", self.section, key)).into()
        })
    }
}

// keys match case-insensitively and the last occurrence wins, as in configparser
fn get<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props
        .iter()
        .filter(|&(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
        .last()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}
