//! Built-in commands.
//!
//! One handler per registered command. Handlers are the error boundary:
//! every remote failure is converted into an error-level output block with
//! a message derived from the error's category (the backend message when
//! one exists, a per-command fallback otherwise). Nothing propagates past
//! the dispatcher.

use std::sync::Arc;

use crate::notify::NotificationOutcome;
use crate::remote::{DirEntry, ObjectKind, PickedFile, ProgressFn, RemoteError};
use crate::shell::batch::{self, ActionOptions, BatchFeedback};
use crate::shell::block::{Block, ProgressId, ProgressStatus, Transcript};
use crate::shell::registry::CommandId;
use crate::shell::{path, Context, Shell};

/// Dispatch a resolved command to its handler.
pub async fn run(id: CommandId, shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match id {
        CommandId::Help => builtin_help(args),
        CommandId::Clear => vec![Block::Clear],
        CommandId::Pwd => builtin_pwd(ctx, args),
        CommandId::List => builtin_list(shell, ctx, args).await,
        CommandId::Cd => builtin_cd(shell, ctx, args).await,
        CommandId::Mkdir => builtin_mkdir(shell, ctx, args).await,
        CommandId::Rm => builtin_rm(shell, ctx, args).await,
        CommandId::Mv => builtin_mv(shell, ctx, args).await,
        CommandId::Rename => builtin_rename(shell, ctx, args).await,
        CommandId::Copy => builtin_copy(shell, ctx, args).await,
        CommandId::Compress => builtin_compress(shell, ctx, args).await,
        CommandId::Download => builtin_download(shell, ctx, args).await,
        CommandId::Upload => builtin_upload(shell, ctx).await,
    }
}

/// Backend message when the failure carries one, per-command fallback
/// otherwise.
fn remote_message(error: &RemoteError, fallback: &str) -> String {
    error
        .backend_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// `[DIR] `-prefixed listing, one entry per line.
fn format_entries(entries: &[DirEntry]) -> Block {
    if entries.is_empty() {
        return Block::muted("Folder is empty");
    }
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "{}{}",
                if entry.is_dir { "[DIR] " } else { "" },
                entry.name
            )
        })
        .collect();
    Block::output(lines.join("\n"))
}

fn builtin_help(args: &[String]) -> Vec<Block> {
    match args {
        [] => {
            let mut lines = vec!["Available commands:".to_string()];
            for id in CommandId::ALL {
                lines.push(format!("  {:<10} {}", id.name(), id.description()));
            }
            vec![Block::info(lines.join("\n"))]
        }
        [name] => match CommandId::find(name) {
            Some(id) => vec![Block::info(format!("{} - {}", id.name(), id.description()))],
            None => vec![Block::error(format!("help: no such command: {name}"))],
        },
        _ => vec![Block::error("help : Usage - help [command]")],
    }
}

fn builtin_pwd(ctx: &Context, args: &[String]) -> Vec<Block> {
    if !args.is_empty() {
        return vec![Block::error("Usage : command pwd doesn't take arguments")];
    }
    vec![Block::info(ctx.current_path.clone())]
}

async fn builtin_list(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [] => vec![format_entries(&ctx.entries)],
        [target] => {
            let resolved = path::resolve(target, &ctx.current_path);
            match shell.remote.list_directory(&resolved).await {
                Ok(listing) => vec![format_entries(&listing.items)],
                Err(e) => vec![Block::error(remote_message(
                    &e,
                    "Impossible de renommer le fichier/dossier.",
                ))],
            }
        }
        _ => vec![Block::error("Invalid arguments for list command.")],
    }
}

async fn builtin_cd(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [] => vec![Block::error("Usage : command cd needs at least 1 argument")],
        [target] => {
            let resolved = path::resolve(target, &ctx.current_path);
            if resolved == ctx.current_path {
                return vec![Block::Nope];
            }

            match shell.remote.resolve_path(&resolved).await {
                Ok(found) if found.exists && found.kind == ObjectKind::Directory => {
                    shell.workspace.navigate(resolved);
                    shell.refresh_listing();
                    vec![Block::Nope]
                }
                Ok(found) if found.exists => {
                    vec![Block::error(format!("cd: {resolved}: not a directory"))]
                }
                Ok(_) => vec![Block::error(format!(
                    "cd: {resolved}: no such file or directory"
                ))],
                Err(e) => match e.status() {
                    Some(404) => vec![Block::error(format!(
                        "cd: {resolved}: no such file or directory"
                    ))],
                    Some(400) => vec![Block::error("cd: invalid path")],
                    _ => vec![Block::error(format!(
                        "cd: {}",
                        remote_message(&e, "unable to resolve path")
                    ))],
                },
            }
        }
        _ => vec![Block::error("cd: too many arguments")],
    }
}

async fn builtin_mkdir(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [] => vec![Block::error(
            "mkdir : Missing directory name. Usage: mkdir <name> or mkdir <path + name>",
        )],
        [target] => {
            let resolved = path::resolve(target, &ctx.current_path);
            let (parent, name) = path::split_parent(&resolved);
            if name.is_empty() {
                return vec![Block::error("mkdir: invalid directory name")];
            }
            match shell.remote.create_folder(&parent, &name).await {
                Ok(()) => {
                    shell.refresh_listing();
                    vec![Block::Nope]
                }
                Err(e) => vec![Block::error(format!(
                    "mkdir: {}",
                    remote_message(&e, "Failed to create directory.")
                ))],
            }
        }
        _ => vec![Block::error("mkdir : Usage - Too many arguments")],
    }
}

async fn builtin_rm(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [] => vec![Block::error("rm : Needs at least 1 argument <path>")],
        [target] => {
            let resolved = path::resolve(target, &ctx.current_path);
            // Deleting the directory we are standing in would strand the
            // terminal; answer with the listing instead.
            if resolved == ctx.current_path {
                return vec![format_entries(&ctx.entries)];
            }
            match shell.remote.delete_object(&resolved).await {
                Ok(()) => {
                    shell.refresh_listing();
                    vec![Block::Nope]
                }
                Err(e) => vec![Block::error(format!(
                    "rm : {}",
                    remote_message(&e, "Fail to delete file/directory")
                ))],
            }
        }
        _ => vec![Block::error("rm : Invalid arguments for rm command.")],
    }
}

async fn builtin_mv(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [] | [_] => vec![Block::error("mv : Usage - Needs at least 2 arguments")],
        [source, destination] => {
            let source = path::resolve(source, &ctx.current_path);
            let destination = path::resolve(destination, &ctx.current_path);
            match shell.remote.move_object(&source, &destination).await {
                Ok(()) => {
                    shell.refresh_listing();
                    vec![Block::Nope]
                }
                Err(e) => vec![Block::error(format!(
                    "mv : {}",
                    remote_message(&e, "Impossible de déplacer le fichier/dossier.")
                ))],
            }
        }
        _ => vec![Block::error("mv : Usage - Too many arguments")],
    }
}

async fn builtin_rename(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [target, new_name] => {
            let resolved = path::resolve(target, &ctx.current_path);
            match shell.remote.rename_object(&resolved, new_name).await {
                Ok(()) => {
                    shell.refresh_listing();
                    vec![Block::Nope]
                }
                Err(e) => vec![Block::error(format!(
                    "rename : {}",
                    remote_message(&e, "Impossible de renommer le fichier/dossier.")
                ))],
            }
        }
        _ => vec![Block::error("rename : Usage - rename <path> <new_name>")],
    }
}

async fn builtin_copy(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [] => vec![Block::error("copy : Usage - copy <source>")],
        [source] | [source, _] => {
            let source = path::resolve(source, &ctx.current_path);
            // Destination defaults to the drive root.
            let destination = path::resolve(
                args.get(1).map(String::as_str).unwrap_or("/"),
                &ctx.current_path,
            );
            match shell.remote.copy_object(&source, &destination).await {
                Ok(()) => {
                    shell.refresh_listing();
                    vec![Block::Nope]
                }
                Err(e) => vec![Block::error(format!(
                    "copy : {}",
                    remote_message(&e, "Impossible de copier le fichier/dossier.")
                ))],
            }
        }
        _ => vec![Block::error("copy : Usage - Too many arguments")],
    }
}

async fn builtin_compress(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [] => vec![Block::error("compress : Usage - compress <path> [name]")],
        [source] | [source, _] => {
            let source = path::resolve(source, &ctx.current_path);
            let base_name = args
                .get(1)
                .map(String::as_str)
                .unwrap_or_else(|| path::leaf(&source));
            if base_name.is_empty() {
                return vec![Block::error("compress : Usage - compress <path> [name]")];
            }
            match shell
                .remote
                .compress_objects(
                    std::slice::from_ref(&source),
                    &ctx.current_path,
                    base_name,
                )
                .await
            {
                Ok(archive) => {
                    shell.refresh_listing();
                    vec![Block::success(format!("Archive créée : {archive}"))]
                }
                Err(e) => vec![Block::error(format!(
                    "compress : {}",
                    remote_message(&e, "Impossible de compresser le fichier/dossier.")
                ))],
            }
        }
        _ => vec![Block::error("compress : Usage - Too many arguments")],
    }
}

/// Fallback download filename: the path leaf, with `.zip` appended when
/// the cached listing knows the target as a directory.
fn fallback_filename(resolved: &str, entries: &[DirEntry]) -> String {
    let leaf = path::leaf(resolved);
    if leaf.is_empty() {
        return "download".to_string();
    }
    let is_dir = entries.iter().any(|e| e.name == leaf && e.is_dir);
    if is_dir {
        format!("{leaf}.zip")
    } else {
        leaf.to_string()
    }
}

async fn builtin_download(shell: &Shell, ctx: &Context, args: &[String]) -> Vec<Block> {
    match args {
        [] => vec![Block::error("download : Needs at least 1 argument <path>")],
        [target] => {
            let resolved = path::resolve(target, &ctx.current_path);
            let download = match shell.remote.download_object(&resolved).await {
                Ok(download) => download,
                Err(e) => {
                    return vec![Block::error(format!(
                        "download : {}",
                        remote_message(&e, "Fail to download file/directory")
                    ))]
                }
            };

            let filename = download
                .filename
                .unwrap_or_else(|| fallback_filename(&resolved, &ctx.entries));
            let destination = shell.download_dir.join(&filename);
            match tokio::fs::write(&destination, &download.body).await {
                Ok(()) => vec![Block::success(format!(
                    "Fichier téléchargé : {}",
                    destination.display()
                ))],
                Err(e) => vec![Block::error(format!("download : {e}"))],
            }
        }
        _ => vec![Block::error(
            "download : Invalid arguments for download command.",
        )],
    }
}

fn update_progress(
    transcript: &Arc<std::sync::Mutex<Transcript>>,
    id: ProgressId,
    loaded: u64,
    status: ProgressStatus,
) {
    transcript
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .update_progress(id, loaded, status);
}

async fn builtin_upload(shell: &Shell, ctx: &Context) -> Vec<Block> {
    let files = shell.picker.pick().await;
    if files.is_empty() {
        return vec![Block::muted("No file selected.")];
    }

    // One progress row per file, appended before any byte moves so the
    // transcript shows the whole batch up front.
    let mut jobs: Vec<(ProgressId, PickedFile)> = Vec::new();
    {
        let mut transcript = shell.transcript.lock().unwrap_or_else(|p| p.into_inner());
        for file in &files {
            let id = transcript.push_progress(file.name.clone(), file.size);
            jobs.push((id, file.clone()));
        }
    }

    let transcript = Arc::clone(&shell.transcript);
    let remote = Arc::clone(&shell.remote);
    let notifier = Arc::clone(&shell.notifier);
    let destination = ctx.current_path.clone();

    let action = move |(id, file): (ProgressId, PickedFile), opts: ActionOptions| {
        let transcript = Arc::clone(&transcript);
        let remote = Arc::clone(&remote);
        let notifier = Arc::clone(&notifier);
        let destination = destination.clone();
        async move {
            update_progress(&transcript, id, 0, ProgressStatus::Uploading);
            let progress: ProgressFn = {
                let transcript = Arc::clone(&transcript);
                Arc::new(move |loaded| {
                    update_progress(&transcript, id, loaded, ProgressStatus::Uploading)
                })
            };

            match remote.upload_file(&file, &destination, progress).await {
                Ok(()) => {
                    update_progress(&transcript, id, file.size, ProgressStatus::Success);
                    if !opts.silent {
                        notifier.push(
                            NotificationOutcome::Success,
                            &format!("Uploaded {}", file.name),
                        );
                    }
                    Ok(())
                }
                Err(e) => {
                    update_progress(&transcript, id, 0, ProgressStatus::Error);
                    Err(anyhow::Error::new(e))
                }
            }
        }
    };

    let feedback = BatchFeedback {
        loading: "Uploading files".to_string(),
        success: "Files uploaded".to_string(),
        error: Some("Upload failed".to_string()),
    };
    let result = batch::run_batch(jobs, action, Some(feedback), shell.notifier.as_ref()).await;
    shell.refresh_listing();

    if let Err(e) = result {
        let message = e
            .downcast_ref::<RemoteError>()
            .and_then(|re| re.backend_message().map(str::to_string))
            .unwrap_or_else(|| "Fail to upload file".to_string());
        return vec![Block::error(format!("upload : {message}"))];
    }
    vec![Block::Nope]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::notify::recording::{Event, RecordingSink};
    use crate::remote::mock::MockRemote;
    use crate::remote::RemoteFs;
    use crate::shell::block::OutputLevel;
    use crate::shell::picker::fixed::FixedPicker;
    use crate::shell::picker::FilePicker;
    use crate::shell::Shell;

    struct Fixture {
        remote: Arc<MockRemote>,
        sink: Arc<RecordingSink>,
        shell: Shell,
    }

    fn fixture_with_picker(remote: MockRemote, picker: Arc<dyn FilePicker>) -> Fixture {
        let remote = Arc::new(remote);
        let sink = Arc::new(RecordingSink::new());
        let shell = Shell::new(
            Arc::clone(&remote) as Arc<dyn RemoteFs>,
            picker,
            Arc::clone(&sink) as Arc<dyn crate::notify::NotificationSink>,
            "/projects",
            std::env::temp_dir(),
        );
        Fixture {
            remote,
            sink,
            shell,
        }
    }

    fn fixture(remote: MockRemote) -> Fixture {
        fixture_with_picker(remote, Arc::new(FixedPicker::empty()))
    }

    fn ctx(entries: Vec<crate::remote::DirEntry>) -> Context {
        Context {
            current_path: "/projects".to_string(),
            entries,
        }
    }

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn error_content(blocks: &[Block]) -> &str {
        match &blocks[0] {
            Block::Output {
                level: OutputLevel::Error,
                content,
            } => content,
            other => panic!("expected error block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pwd_rejects_arguments() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Pwd, &f.shell, &ctx(vec![]), &args(&["x"])).await;
        assert_eq!(
            error_content(&blocks),
            "Usage : command pwd doesn't take arguments"
        );
    }

    #[tokio::test]
    async fn test_pwd_emits_current_path_as_info() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Pwd, &f.shell, &ctx(vec![]), &[]).await;
        assert_eq!(
            blocks,
            vec![Block::Output {
                level: OutputLevel::Info,
                content: "/projects".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Help, &f.shell, &ctx(vec![]), &[]).await;
        let Block::Output { content, .. } = &blocks[0] else {
            panic!("expected output block");
        };
        for id in CommandId::ALL {
            assert!(content.contains(id.name()), "missing {}", id.name());
        }
    }

    #[tokio::test]
    async fn test_help_unknown_name() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Help, &f.shell, &ctx(vec![]), &args(&["wat"])).await;
        assert_eq!(error_content(&blocks), "help: no such command: wat");
    }

    #[tokio::test]
    async fn test_list_empty_directory_is_muted_notice() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::List, &f.shell, &ctx(vec![]), &[]).await;
        assert_eq!(blocks, vec![Block::muted("Folder is empty")]);
    }

    #[tokio::test]
    async fn test_list_formats_cached_entries() {
        let f = fixture(MockRemote::new());
        let entries = vec![
            MockRemote::entry("docs", true),
            MockRemote::entry("a.txt", false),
        ];
        let blocks = run(CommandId::List, &f.shell, &ctx(entries), &[]).await;
        assert_eq!(blocks, vec![Block::output("[DIR] docs\na.txt")]);
    }

    #[tokio::test]
    async fn test_list_with_path_fetches_remote_listing() {
        let remote = MockRemote::new()
            .with_listing("/projects/sub", vec![MockRemote::entry("x.bin", false)]);
        let f = fixture(remote);
        let blocks = run(CommandId::List, &f.shell, &ctx(vec![]), &args(&["sub"])).await;
        assert_eq!(blocks, vec![Block::output("x.bin")]);
        assert!(f.remote.calls().contains(&"list /projects/sub".to_string()));
    }

    #[tokio::test]
    async fn test_cd_missing_target_maps_404() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Cd, &f.shell, &ctx(vec![]), &args(&["ghost"])).await;
        assert_eq!(
            error_content(&blocks),
            "cd: /projects/ghost: no such file or directory"
        );
    }

    #[tokio::test]
    async fn test_cd_file_target_is_not_a_directory() {
        let remote =
            MockRemote::new().with_resolution("/projects/a.txt", true, ObjectKind::File);
        let f = fixture(remote);
        let blocks = run(CommandId::Cd, &f.shell, &ctx(vec![]), &args(&["a.txt"])).await;
        assert_eq!(
            error_content(&blocks),
            "cd: /projects/a.txt: not a directory"
        );
        assert_eq!(f.shell.workspace.current_path(), "/projects");
    }

    #[tokio::test]
    async fn test_mkdir_splits_parent_and_leaf() {
        let f = fixture(MockRemote::new());
        let blocks = run(
            CommandId::Mkdir,
            &f.shell,
            &ctx(vec![]),
            &args(&["reports/2024"]),
        )
        .await;
        assert_eq!(blocks, vec![Block::Nope]);
        assert!(f
            .remote
            .calls()
            .contains(&"create_folder /projects/reports 2024".to_string()));
    }

    #[tokio::test]
    async fn test_mkdir_surfaces_backend_message() {
        let f = fixture(MockRemote::new().with_failure(409, "Le dossier existe déjà"));
        let blocks = run(CommandId::Mkdir, &f.shell, &ctx(vec![]), &args(&["dup"])).await;
        assert_eq!(error_content(&blocks), "mkdir: Le dossier existe déjà");
    }

    #[tokio::test]
    async fn test_rm_refuses_current_directory() {
        let f = fixture(MockRemote::new());
        let entries = vec![MockRemote::entry("a.txt", false)];
        let blocks = run(CommandId::Rm, &f.shell, &ctx(entries), &args(&["."])).await;
        // Safety no-op: the current listing comes back instead of a delete.
        assert_eq!(blocks, vec![Block::output("a.txt")]);
        assert!(f.remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rm_deletes_and_refreshes() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Rm, &f.shell, &ctx(vec![]), &args(&["old.txt"])).await;
        assert_eq!(blocks, vec![Block::Nope]);
        assert!(f.remote.calls().contains(&"delete /projects/old.txt".to_string()));
    }

    #[tokio::test]
    async fn test_mv_requires_two_arguments() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Mv, &f.shell, &ctx(vec![]), &args(&["only"])).await;
        assert_eq!(error_content(&blocks), "mv : Usage - Needs at least 2 arguments");
    }

    #[tokio::test]
    async fn test_mv_resolves_both_paths() {
        let f = fixture(MockRemote::new());
        let blocks = run(
            CommandId::Mv,
            &f.shell,
            &ctx(vec![]),
            &args(&["a.txt", "../archive"]),
        )
        .await;
        assert_eq!(blocks, vec![Block::Nope]);
        assert!(f
            .remote
            .calls()
            .contains(&"move /projects/a.txt /archive".to_string()));
    }

    #[tokio::test]
    async fn test_mv_falls_back_to_generic_message() {
        let f = fixture(MockRemote::new().with_failure(500, ""));
        let blocks = run(
            CommandId::Mv,
            &f.shell,
            &ctx(vec![]),
            &args(&["a", "b"]),
        )
        .await;
        assert_eq!(
            error_content(&blocks),
            "mv : Impossible de déplacer le fichier/dossier."
        );
    }

    #[tokio::test]
    async fn test_copy_destination_defaults_to_root() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Copy, &f.shell, &ctx(vec![]), &args(&["a.txt"])).await;
        assert_eq!(blocks, vec![Block::Nope]);
        assert!(f.remote.calls().contains(&"copy /projects/a.txt /".to_string()));
    }

    #[tokio::test]
    async fn test_rename_passes_new_leaf_name() {
        let f = fixture(MockRemote::new());
        let blocks = run(
            CommandId::Rename,
            &f.shell,
            &ctx(vec![]),
            &args(&["a.txt", "b.txt"]),
        )
        .await;
        assert_eq!(blocks, vec![Block::Nope]);
        assert!(f
            .remote
            .calls()
            .contains(&"rename /projects/a.txt b.txt".to_string()));
    }

    #[tokio::test]
    async fn test_compress_defaults_output_name_to_leaf() {
        let f = fixture(MockRemote::new());
        let blocks = run(
            CommandId::Compress,
            &f.shell,
            &ctx(vec![]),
            &args(&["reports"]),
        )
        .await;
        assert_eq!(blocks, vec![Block::success("Archive créée : reports.zip")]);
        assert!(f
            .remote
            .calls()
            .contains(&"compress /projects/reports /projects reports".to_string()));
    }

    #[tokio::test]
    async fn test_download_writes_body_with_leaf_fallback() {
        let dir = std::env::temp_dir().join(format!("nimbus-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let remote = Arc::new(MockRemote::new());
        let sink = Arc::new(RecordingSink::new());
        let shell = Shell::new(
            Arc::clone(&remote) as Arc<dyn RemoteFs>,
            Arc::new(FixedPicker::empty()),
            sink,
            "/projects",
            dir.clone(),
        );

        let blocks = run(
            CommandId::Download,
            &shell,
            &ctx(vec![]),
            &args(&["notes.txt"]),
        )
        .await;
        assert!(matches!(
            blocks[0],
            Block::Output {
                level: OutputLevel::Success,
                ..
            }
        ));
        assert_eq!(std::fs::read(dir.join("notes.txt")).unwrap(), b"payload");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_download_appends_zip_for_known_directories() {
        let entries = vec![MockRemote::entry("reports", true)];
        assert_eq!(fallback_filename("/projects/reports", &entries), "reports.zip");
        assert_eq!(fallback_filename("/projects/a.txt", &entries), "a.txt");
    }

    #[tokio::test]
    async fn test_upload_with_empty_selection_is_muted() {
        let f = fixture(MockRemote::new());
        let blocks = run(CommandId::Upload, &f.shell, &ctx(vec![]), &[]).await;
        assert_eq!(blocks, vec![Block::muted("No file selected.")]);
        assert!(f.sink.events().is_empty());
    }

    fn picked(name: &str, size: u64) -> PickedFile {
        PickedFile {
            path: std::path::PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            size,
        }
    }

    #[tokio::test]
    async fn test_upload_single_file_bypasses_batch_feedback() {
        let f = fixture_with_picker(
            MockRemote::new(),
            Arc::new(FixedPicker::with(vec![picked("one.txt", 10)])),
        );
        let blocks = run(CommandId::Upload, &f.shell, &ctx(vec![]), &[]).await;
        assert_eq!(blocks, vec![Block::Nope]);

        // No aggregate notification, only the per-item success.
        let events = f.sink.events();
        assert_eq!(
            events,
            vec![Event::Pushed {
                outcome: NotificationOutcome::Success,
                message: "Uploaded one.txt".to_string()
            }]
        );

        let transcript = f.shell.transcript.lock().unwrap();
        match &transcript.blocks()[0] {
            Block::Progress {
                loaded,
                total,
                status,
                ..
            } => {
                assert_eq!((*loaded, *total), (10, 10));
                assert_eq!(*status, ProgressStatus::Success);
            }
            other => panic!("expected progress block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_many_files_uses_batch_feedback() {
        let f = fixture_with_picker(
            MockRemote::new(),
            Arc::new(FixedPicker::with(vec![
                picked("one.txt", 10),
                picked("two.txt", 20),
            ])),
        );
        let blocks = run(CommandId::Upload, &f.shell, &ctx(vec![]), &[]).await;
        assert_eq!(blocks, vec![Block::Nope]);

        let events = f.sink.events();
        assert!(matches!(events.first(), Some(Event::Started { .. })));
        assert!(matches!(
            events.last(),
            Some(Event::Resolved {
                outcome: NotificationOutcome::Success,
                ..
            })
        ));
        // Silent items: no per-file pushes.
        assert!(!events.iter().any(|e| matches!(e, Event::Pushed { .. })));
    }
}
