use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tagdeck")]
#[command(version)]
#[command(about = "Browse a directory of images and edit their Finder tags")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Directory to browse (replaces the remembered one)
    #[arg(short, long, global = true)]
    pub(crate) dir: Option<PathBuf>,

    /// Path to the `tag` executable
    #[arg(long, global = true)]
    pub(crate) tag_bin: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the tags of a file
    List {
        /// File to inspect
        path: PathBuf,
    },
    /// Add tags to a file
    Add {
        path: PathBuf,
        /// Tag names (comma separated or repeated)
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },
    /// Remove tags from a file
    Remove {
        path: PathBuf,
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },
    /// Replace the tags of a file (no tags clears them)
    Set {
        path: PathBuf,
        tags: Vec<String>,
    },
    /// List the images the browser would show for a directory
    Files {
        /// Directory to list (defaults to --dir or the remembered one)
        path: Option<PathBuf>,
    },
    /// Manage the working tag vocabulary
    Working {
        #[command(subcommand)]
        action: WorkingAction,
    },
    /// Interactive setup wizard for new users
    Init,
}

#[derive(Subcommand)]
pub(crate) enum WorkingAction {
    /// Print the working directory and working tags
    Show,
    /// Replace the working tags
    Set {
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },
    /// Forget all working tags
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_browser() {
        let cli = Cli::try_parse_from(["tagdeck", "--dir", "/pics"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.dir, Some(PathBuf::from("/pics")));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tagdeck", "add", "a.png", "red", "blue", "--tag-bin", "/t"])
                .unwrap();
        assert_eq!(cli.tag_bin, Some(PathBuf::from("/t")));
        match cli.command {
            Some(Commands::Add { path, tags }) => {
                assert_eq!(path, PathBuf::from("a.png"));
                assert_eq!(tags, vec!["red", "blue"]);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn add_requires_tags_but_set_does_not() {
        assert!(Cli::try_parse_from(["tagdeck", "add", "a.png"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["tagdeck", "set", "a.png"]).unwrap().command,
            Some(Commands::Set { ref tags, .. }) if tags.is_empty()
        ));
    }
}
