//! Subcommand handlers over the core editor service.

use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use myblog_core::render::{render_markdown_with, MarkupTheme};
use log::info;
use myblog_core::{
    format_date, render_markdown, BlogError, BlogService, Clock, ExchangeError, KeyValueStore,
    Post, PostId, SortDirection,
};

use crate::{Command, ContentArgs};

pub fn run<S: KeyValueStore, C: Clock>(
    service: &mut BlogService<S, C>,
    command: Command,
) -> Result<()> {
    match command {
        Command::New {
            title,
            tags,
            body,
            publish,
        } => {
            service.start_new();
            let draft = service.draft_mut();
            draft.title = title;
            draft.tags_input = tags;
            draft.content = body.resolve()?.unwrap_or_default();
            save(service, publish)
        }
        Command::Edit {
            id,
            title,
            tags,
            body,
            publish,
        } => edit(service, &PostId::from(id), title, tags, &body, publish),
        Command::List {
            published_only,
            query,
            oldest_first,
        } => {
            let view = service.view_mut();
            view.published_only = published_only;
            view.query = query.unwrap_or_default();
            if oldest_first {
                view.sort = SortDirection::OldestFirst;
            }
            list(service);
            Ok(())
        }
        Command::Show { id, raw } => show(service, &PostId::from(id), raw),
        Command::Publish { id } => {
            let post = service.toggle_publish(&PostId::from(id))?;
            let state = if post.published { "published" } else { "unpublished" };
            println!("{state} {}", post.id);
            Ok(())
        }
        Command::Delete { id, yes } => delete(service, &PostId::from(id), yes),
        Command::Export { dir, stdout } => {
            if stdout {
                println!("{}", service.export_json()?);
            } else {
                let path = service.export_to_dir(&dir)?;
                println!("exported {} posts to {}", service.posts().len(), path.display());
            }
            Ok(())
        }
        Command::Import { file } => import(service, &file),
        // Handled before storage is opened.
        Command::Version | Command::Preview { .. } => Ok(()),
    }
}

pub fn preview(file: Option<&Path>, plain: bool) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        println!("Nothing to preview yet...");
    } else if plain {
        println!("{}", render_markdown_with(&text, &MarkupTheme::plain()));
    } else {
        println!("{}", render_markdown(&text));
    }
    Ok(())
}

fn edit<S: KeyValueStore, C: Clock>(
    service: &mut BlogService<S, C>,
    id: &PostId,
    title: Option<String>,
    tags: Option<String>,
    body: &ContentArgs,
    publish: bool,
) -> Result<()> {
    let content = body.resolve()?;
    service.load_for_edit(id)?;

    let draft = service.draft_mut();
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(tags) = tags {
        draft.tags_input = tags;
    }
    if let Some(content) = content {
        draft.content = content;
    }
    save(service, publish)
}

fn save<S: KeyValueStore, C: Clock>(service: &mut BlogService<S, C>, publish: bool) -> Result<()> {
    match service.save(publish) {
        Ok(post) => {
            let state = if post.published { "published" } else { "saved draft" };
            println!("{state} {} ({})", post.id, post.title);
            Ok(())
        }
        Err(BlogError::EmptyTitle) => bail!("Please add a title"),
        Err(err) => Err(err.into()),
    }
}

fn list<S: KeyValueStore, C: Clock>(service: &BlogService<S, C>) {
    let visible = service.visible_posts();
    if visible.is_empty() {
        println!("No posts yet.");
        return;
    }
    for post in visible {
        println!("{}", summary_line(post));
    }
}

fn summary_line(post: &Post) -> String {
    let state = if post.published { "published" } else { "draft" };
    let mut line = format!(
        "{}  {:<9}  {}  {}",
        post.id,
        state,
        format_date(post.updated_at),
        post.title
    );
    if !post.tags.is_empty() {
        line.push_str(&format!("  #{}", post.tags.join(" #")));
    }
    line
}

fn show<S: KeyValueStore, C: Clock>(
    service: &BlogService<S, C>,
    id: &PostId,
    raw: bool,
) -> Result<()> {
    let Some(post) = service.store().get(id) else {
        bail!("post not found: {id}");
    };

    println!("{}", post.title);
    println!(
        "id={} state={} created={} updated={} tags={}",
        post.id,
        if post.published { "published" } else { "draft" },
        format_date(post.created_at),
        format_date(post.updated_at),
        post.tags.join(",")
    );
    println!();
    if raw {
        println!("{}", post.content);
    } else if post.content.trim().is_empty() {
        println!("Nothing to preview yet...");
    } else {
        println!("{}", render_markdown(&post.content));
    }
    Ok(())
}

fn delete<S: KeyValueStore, C: Clock>(
    service: &mut BlogService<S, C>,
    id: &PostId,
    yes: bool,
) -> Result<()> {
    let Some(post) = service.store().get(id) else {
        bail!("post not found: {id}");
    };
    if !yes && !confirm(&format!("Delete \u{201c}{}\u{201d}?", post.title))? {
        info!("event=post_delete module=cli status=cancelled post_id={id}");
        return Ok(());
    }

    let removed = service.delete(id)?;
    println!("deleted {}", removed.id);
    Ok(())
}

fn import<S: KeyValueStore, C: Clock>(
    service: &mut BlogService<S, C>,
    file: &Path,
) -> Result<()> {
    match service.import_file(file) {
        Ok(count) => {
            println!("imported {count} posts");
            Ok(())
        }
        Err(BlogError::Exchange(ExchangeError::Io(err))) => {
            Err(err).with_context(|| format!("failed to read {}", file.display()))
        }
        // Invalid payloads leave the collection as it was.
        Err(err) => {
            info!(
                "event=post_import module=cli status=ignored file={} error={err}",
                file.display()
            );
            Ok(())
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::{import, run, summary_line};
    use crate::{Command, ContentArgs};
    use myblog_core::{BlogService, FixedClock, MemoryKeyValueStore, Post};

    #[test]
    fn summary_line_lists_tags_with_hashes() {
        let post = Post::new("Hello", "", vec!["a".to_string(), "b".to_string()], true, 0);
        let line = summary_line(&post);
        assert!(line.contains("published"));
        assert!(line.ends_with("Hello  #a #b"));
    }

    #[test]
    fn new_with_blank_title_fails() {
        let clock = FixedClock::new(1);
        let mut service = BlogService::open(MemoryKeyValueStore::new(), &clock);
        let err = run(
            &mut service,
            Command::New {
                title: "  ".to_string(),
                tags: String::new(),
                body: ContentArgs::default(),
                publish: false,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Please add a title");
        assert!(service.posts().is_empty());
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let clock = FixedClock::new(1);
        let mut service = BlogService::open(MemoryKeyValueStore::new(), &clock);
        run(
            &mut service,
            Command::New {
                title: "First".to_string(),
                tags: "x, y".to_string(),
                body: ContentArgs {
                    content: Some("body".to_string()),
                    content_file: None,
                },
                publish: false,
            },
        )
        .unwrap();
        let id = service.posts()[0].id.to_string();

        run(
            &mut service,
            Command::Edit {
                id,
                title: Some("Renamed".to_string()),
                tags: None,
                body: ContentArgs::default(),
                publish: true,
            },
        )
        .unwrap();

        let post = &service.posts()[0];
        assert_eq!(post.title, "Renamed");
        assert_eq!(post.content, "body");
        assert_eq!(post.tags, vec!["x", "y"]);
        assert!(post.published);
    }

    #[test]
    fn import_ignores_invalid_payload_but_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"not":"an array"}"#).unwrap();

        let clock = FixedClock::new(1);
        let mut service = BlogService::open(MemoryKeyValueStore::new(), &clock);
        service.draft_mut().title = "kept".to_string();
        service.save(false).unwrap();

        import(&mut service, &bad).unwrap();
        assert_eq!(service.posts().len(), 1);

        let err = import(&mut service, &dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
        assert_eq!(service.posts().len(), 1);
    }
}
