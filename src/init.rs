use crate::app::Config;
use crate::gateway::DEFAULT_TAG_BINARY;
use crate::session::parse_tag_input;
use crate::store::{encode_tags, JsonFileStore, SessionKey, SessionStore};
use crate::utils::{expand_tilde, list_images};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::PathBuf;

/// Interactive setup wizard for new users
pub async fn run_init() -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("\ntagdeck setup\n");
    println!("Let's point tagdeck at your tag tool and images.\n");

    let config_path = Config::config_path();
    if config_path.exists() {
        let overwrite = Confirm::with_theme(&theme)
            .with_prompt("Config file already exists. Overwrite?")
            .default(false)
            .interact()?;

        if !overwrite {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    // Step 1: tag executable
    let tag_binary: String = Input::with_theme(&theme)
        .with_prompt("Path to the tag executable")
        .default(DEFAULT_TAG_BINARY.to_string())
        .interact_text()?;
    let tag_binary = expand_tilde(&tag_binary);
    if !tag_binary.exists() {
        println!("⚠ {} not found.", tag_binary.display());
        println!("  Install it with `brew install tag` or edit [tag] in the config later.");
    }

    // Step 2: starting directory
    let default_dir = dirs::picture_dir().unwrap_or_else(|| PathBuf::from("~/Pictures"));
    let start_dir: String = Input::with_theme(&theme)
        .with_prompt("Directory to browse")
        .default(default_dir.to_string_lossy().to_string())
        .interact_text()?;
    let start_dir = expand_tilde(&start_dir);
    if start_dir.is_dir() {
        let count = list_images(&start_dir).await.len();
        println!("✓ {} image(s) in {}", count, start_dir.display());
    } else {
        println!("⚠ {} is not a directory; choose another with `o`.", start_dir.display());
    }

    // Step 3: working tags
    let working: String = Input::with_theme(&theme)
        .with_prompt("Working tags (comma separated)")
        .allow_empty(true)
        .interact_text()?;
    let working_tags = parse_tag_input(&working);

    // Step 4: notice duration
    let durations = vec![
        "3 seconds (recommended)",
        "1.5 seconds",
        "5 seconds",
    ];
    let duration_idx = Select::with_theme(&theme)
        .with_prompt("How long tag change notices stay visible")
        .items(&durations)
        .default(0)
        .interact()?;

    let mut config = Config::default();
    config.tag.binary = tag_binary;
    config.alert.duration_ms = match duration_idx {
        1 => 1500,
        2 => 5000,
        _ => 3000,
    };

    config.save()?;
    println!("\n✓ Config saved to {}", config_path.display());

    let mut store = JsonFileStore::open_default();
    store.save(SessionKey::WorkingDir, &start_dir.to_string_lossy())?;
    store.save(SessionKey::WorkingTags, &encode_tags(&working_tags))?;
    println!("✓ Session saved to {}", JsonFileStore::default_path().display());

    println!("\nSetup complete! Run 'tagdeck' to start browsing.\n");

    Ok(())
}
