use super::*;
use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, OutputFormat};

/// Prints the session's error status, or the error itself, and exits.
fn fail(ctx: &AppContext, session: &Session, err: &RepixError) -> ! {
    match session.status().latest() {
        Some(message) if message.level == librepix::StatusLevel::Error => {
            ctx.formatter().status(message)
        }
        _ => ctx.formatter().error(&err.to_string()),
    }
    std::process::exit(1);
}

fn client_or_exit(ctx: &AppContext) -> RepositoryImageClient {
    match ctx.client() {
        Ok(client) => client,
        Err(e) => {
            ctx.formatter().error(&e);
            std::process::exit(1);
        }
    }
}

fn print_or_exit(ctx: &AppContext, rendered: std::result::Result<String, String>) {
    match rendered {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            ctx.formatter().error(&e);
            std::process::exit(1);
        }
    }
}

/// Handle the list command
pub async fn handle_list(ctx: &AppContext, format: OutputFormat, quiet: bool) {
    let client = client_or_exit(ctx);
    let mut session = ctx.session();
    ctx.print(VerbosityLevel::Verbose, "Listing images...");

    let spinner = ctx.formatter().spinner("Loading images...");
    let result = client.list_files(&mut session).await;
    spinner.finish_and_clear();

    let files = match result {
        Ok(files) => files,
        Err(e) => fail(ctx, &session, &e),
    };

    if quiet {
        for file in files {
            println!("{}", file.name);
        }
        return;
    }

    print_or_exit(ctx, format::render_listing(session.listing(), format));
}

/// Handle the upload command
pub async fn handle_upload(
    ctx: &AppContext,
    file: &Path,
    name: Option<&str>,
    format: OutputFormat,
) {
    let client = client_or_exit(ctx);
    let mut session = ctx.session();
    ctx.print(
        VerbosityLevel::Verbose,
        &format!("Uploading {}...", file.display()),
    );

    let spinner = ctx.formatter().spinner("Uploading image...");
    let result = upload(&client, &mut session, file, name).await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => match format {
            OutputFormat::Pretty => ctx.formatter().success(&report.format_pretty()),
            _ => print_or_exit(ctx, format::format_output(&report, format)),
        },
        Err(e) => fail(ctx, &session, &e),
    }
}

/// Handle the view command
pub async fn handle_view(ctx: &AppContext, name: &str, output: Option<&Path>) {
    let client = client_or_exit(ctx);
    let mut session = ctx.session();

    let spinner = ctx.formatter().spinner("Loading image...");
    let result = view(&client, &mut session, name, output).await;
    spinner.finish_and_clear();

    match result {
        Ok(path) => ctx
            .formatter()
            .success(&format!("Image loaded: {} -> {}", name, path.display())),
        Err(e) => fail(ctx, &session, &e),
    }
}

/// Handle the delete command
pub async fn handle_delete(ctx: &AppContext, name: &str, force: bool) {
    let client = client_or_exit(ctx);
    let mut session = ctx.session();

    let result = if force {
        delete(&client, &mut session, name, &mut |_: &str| true).await
    } else {
        delete(&client, &mut session, name, &mut prompt_confirm).await
    };

    match result {
        Ok(DeleteOutcome::Deleted) => ctx
            .formatter()
            .success(&format!("Image deleted: {}", name)),
        Ok(DeleteOutcome::Cancelled) => println!("Aborted."),
        Err(e) => fail(ctx, &session, &e),
    }
}
