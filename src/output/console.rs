//! Console output utilities.

use console::{style, StyledObject};

fn line(tag: StyledObject<&str>, message: &str) -> String {
    format!("{:>5} {}", tag, message)
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{}", line(style("INFO").cyan().bold(), message));
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{}", line(style("DONE").green().bold(), message));
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{}", line(style("WARN").yellow().bold(), message));
}

/// Print an error message to stderr.
pub fn print_error(message: &str) {
    eprintln!("{}", line(style("ERROR").red().bold(), message));
}

pub fn print_banner() {
    println!();
    println!(
        "{} {}",
        style("fanbox-archiver").magenta().bold(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    );
    println!("{}", style("incremental creator archive").dim());
    println!();
}

/// Print what this run is going to archive and where.
pub fn print_config_summary(creator_id: &str, archive_dir: &str, has_session: bool) {
    let session = if has_session {
        style("browser cookie").green()
    } else {
        style("none (public content only)").yellow()
    };

    println!("{}", style("Run:").bold());
    println!("  creator   {}", style(creator_id).bold());
    println!("  archive   {}/{}", archive_dir, creator_id);
    println!("  session   {}", session);
    println!();
}
