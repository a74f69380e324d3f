use crate::cli::ConfigCommands;
use crate::config::{parse_key, Config};
use crate::errors::Result;
use wechat_utils::mask_secret;

/// Handles the `config` command for configuration management and inspection.
///
/// `set` and `unset` write the file immediately. `get` on `auth.access_token`
/// prints the token masked, as `show` does.
pub async fn handle(action: ConfigCommands, mut config: Config) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("Configuration file: {}", config.config_path().display());
            println!();
            print!("{}", config.show_config());
        }
        ConfigCommands::Get { key } => {
            let (section, name) = parse_key(&key)?;
            match config.get_value(section, name)? {
                Some(value) => println!("{}", display_value(section, name, &value)),
                None => println!("{} is not set", key),
            }
        }
        ConfigCommands::Set { key, value } => {
            let (section, name) = parse_key(&key)?;
            config.set_value(section, name, &value)?;
            config.save()?;
            println!("Set {} = {}", key, display_value(section, name, &value));
        }
        ConfigCommands::Unset { key } => {
            let (section, name) = parse_key(&key)?;
            match config.unset_value(section, name)? {
                Some(_) => {
                    config.save()?;
                    println!("Removed {}", key);
                }
                None => println!("{} is not set", key),
            }
        }
        ConfigCommands::Path => {
            println!("{}", config.config_path().display());
        }
    }

    Ok(())
}

fn display_value(section: &str, key: &str, value: &str) -> String {
    if section == "auth" && key == "access_token" {
        mask_secret(value)
    } else {
        value.to_string()
    }
}
