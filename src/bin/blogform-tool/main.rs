use clap::Parser;

use crate::bootstrap::bootstrap_cmd;
use crate::post::{delete_cmd, list_cmd, submit_cmd, view_cmd};

mod bootstrap;
mod decompress;
mod post;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Bootstrap a new blog form directory
    Bootstrap(BootstrapArgs),
    /// Submit a new post
    Submit(SubmitArgs),
    /// List stored posts
    List(StoreArgs),
    /// Count a view and print the post
    View(PostArgs),
    /// Delete a post
    Delete(PostArgs),
}

#[derive(clap::Args, Debug)]
struct BootstrapArgs {
    /// Directory where templates, assets and config will be generated
    #[arg(short, long)]
    out_dir: String,
}

#[derive(clap::Args, Debug)]
struct StoreArgs {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,
}

#[derive(clap::Args, Debug)]
struct SubmitArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    name: Option<String>,

    /// Email of the author
    #[arg(short, long)]
    email: Option<String>,

    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Description of the post
    #[arg(short, long)]
    description: Option<String>,
}

#[derive(clap::Args, Debug)]
struct PostArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Post id, as printed by the list command
    #[arg(short, long)]
    id: String,
}

fn main() {
    let args = Args::parse();

    let result = match args {
        Args::Bootstrap(args) => bootstrap_cmd(args),
        Args::Submit(args) => submit_cmd(args),
        Args::List(args) => list_cmd(args),
        Args::View(args) => view_cmd(args),
        Args::Delete(args) => delete_cmd(args),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
