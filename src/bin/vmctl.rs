use std::collections::HashMap;

use anyhow::Result;
use clap::Parser;

use vmops::gcp::get_project_id;
use vmops::{Action, Command, GceClient, VmController};

#[derive(Parser, Debug)]
#[command(
    name = "vmctl",
    about = "Run one VM lifecycle action directly, without going through Pub/Sub"
)]
struct Args {
    #[arg(name = "ACTION", help = "start, stop, create or delete")]
    action: String,

    #[arg(name = "INSTANCE_NAME")]
    name: String,

    #[arg(long, default_value = "europe-southwest1-b")]
    zone: String,

    #[arg(long, help = "Machine type for create (default: e2-small)")]
    machine_type: Option<String>,

    #[arg(long, help = "Image family for create (default: debian-11)")]
    image_family: Option<String>,

    #[arg(long, help = "Network for create (default: global/networks/default)")]
    network: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let action = Action::parse(&args.action)?;

    let mut params = HashMap::new();
    if let Some(machine_type) = args.machine_type {
        params.insert("machine_type".to_string(), machine_type);
    }
    if let Some(image_family) = args.image_family {
        params.insert("image_family".to_string(), image_family);
    }
    if let Some(network) = args.network {
        params.insert("network".to_string(), network);
    }

    let project = get_project_id().await?;
    println!(
        "Running '{}' on instance '{}' in zone '{}' (project: {})...",
        action, args.name, args.zone, project
    );

    let controller = VmController::new(GceClient::new(project));
    let command = Command {
        vm_name: args.name,
        zone: args.zone,
        action,
        params,
    };

    match controller.run(&command).await {
        Ok(()) => {
            println!("Request accepted.");
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to run '{}': {:#}", action, e);
            std::process::exit(1);
        }
    }
}
