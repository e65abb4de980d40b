use anyhow::Result;

use crate::cli::WorkingAction;
use crate::session::parse_tag_input;
use crate::store::{encode_tags, SessionKey, SessionStore};

pub fn cmd_working(store: &mut dyn SessionStore, action: WorkingAction) -> Result<()> {
    match action {
        WorkingAction::Show => {
            let snapshot = store.load()?;
            match &snapshot.working_dir {
                Some(dir) => println!("Directory: {}", dir.display()),
                None => println!("Directory: (none)"),
            }
            if snapshot.working_tags.is_empty() {
                println!("Working tags: (none)");
            } else {
                println!("Working tags: {}", snapshot.working_tags.join(", "));
            }
        }
        WorkingAction::Set { tags } => {
            let tags = parse_tag_input(&tags.join(","));
            store.save(SessionKey::WorkingTags, &encode_tags(&tags))?;
            println!("✓ Working tags: {}", tags.join(", "));
        }
        WorkingAction::Clear => {
            store.save(SessionKey::WorkingTags, &encode_tags(&[]))?;
            println!("✓ Working tags cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn set_normalizes_and_clear_empties() -> Result<()> {
        let mut store = MemoryStore::default();

        cmd_working(
            &mut store,
            WorkingAction::Set {
                tags: vec!["a, b".to_string(), "a".to_string()],
            },
        )?;
        assert_eq!(store.load()?.working_tags, vec!["a", "b"]);

        cmd_working(&mut store, WorkingAction::Clear)?;
        assert!(store.load()?.working_tags.is_empty());
        Ok(())
    }
}
