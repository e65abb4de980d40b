use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::alert::Notice;
use crate::gateway::{TagGateway, TagOp};
use crate::session::parse_tag_input;
use crate::store::SessionStore;
use crate::utils;

/// Accept both `red blue` and `red,blue` on the command line.
fn collect_tags(args: &[String]) -> Vec<String> {
    parse_tag_input(&args.join(","))
}

pub async fn cmd_list(gateway: &TagGateway, path: &Path) -> Result<()> {
    let tags = gateway
        .list(path)
        .await
        .with_context(|| format!("Reading tags of {}", path.display()))?;

    if tags.is_empty() {
        println!("No tags on {}", path.display());
    } else {
        for tag in tags {
            println!("{}", tag);
        }
    }
    Ok(())
}

async fn commit(gateway: &TagGateway, path: &Path, op: TagOp) -> Result<()> {
    let before = gateway
        .list(path)
        .await
        .with_context(|| format!("Reading tags of {}", path.display()))?;
    gateway
        .apply(path, &op)
        .await
        .with_context(|| format!("Updating tags of {}", path.display()))?;

    let notice = Notice::describe(&before, &op);
    tracing::info!(path = %path.display(), ?op, "tags updated from command line");
    println!("✓ {} ({})", notice.message(), path.display());
    Ok(())
}

pub async fn cmd_add(gateway: &TagGateway, path: &Path, tags: &[String]) -> Result<()> {
    let tags = collect_tags(tags);
    if tags.is_empty() {
        bail!("No tag names given");
    }
    commit(gateway, path, TagOp::Add(tags)).await
}

pub async fn cmd_remove(gateway: &TagGateway, path: &Path, tags: &[String]) -> Result<()> {
    let tags = collect_tags(tags);
    if tags.is_empty() {
        bail!("No tag names given");
    }
    commit(gateway, path, TagOp::Remove(tags)).await
}

pub async fn cmd_set(gateway: &TagGateway, path: &Path, tags: &[String]) -> Result<()> {
    commit(gateway, path, TagOp::Set(collect_tags(tags))).await
}

pub async fn cmd_files(store: &dyn SessionStore, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => match store.load()?.working_dir {
            Some(dir) => dir,
            None => bail!("No directory given and none remembered; pass --dir"),
        },
    };

    let files = utils::list_images(&dir).await;
    if files.is_empty() {
        println!("No images in {}", dir.display());
    } else {
        for name in files {
            println!("{}", name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::FakeTool;

    #[test]
    fn tags_from_words_and_commas() {
        let args = vec!["red,blue".to_string(), " green ".to_string(), "red".to_string()];
        assert_eq!(collect_tags(&args), vec!["red", "blue", "green"]);
    }

    #[tokio::test]
    async fn set_reports_and_applies() -> Result<()> {
        let fake = FakeTool::new();
        let image = fake.image("a.png", &["old"]);

        cmd_set(&fake.gateway, &image, &["new".to_string()]).await?;
        assert_eq!(fake.gateway.list(&image).await?, vec!["new"]);
        Ok(())
    }

    #[tokio::test]
    async fn add_without_names_fails_early() {
        let fake = FakeTool::new();
        let image = fake.image("a.png", &[]);

        assert!(cmd_add(&fake.gateway, &image, &[" , ".to_string()]).await.is_err());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn tool_failure_carries_context() {
        let fake = FakeTool::new();
        let image = fake.image("broken.png", &[]);

        let err = cmd_list(&fake.gateway, &image).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Reading tags of"));
    }
}
