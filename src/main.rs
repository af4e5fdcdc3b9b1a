use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use nexus_chat::config::parse_retention;
use nexus_chat::net::api::UploadFile;
use nexus_chat::net::socket::ConnectionStatus;
use nexus_chat::net::types::ChatMessage;
use nexus_chat::state::session::{FileSessionStore, MemorySessionStore, SessionStore};
use nexus_chat::util::bubble::Bubble;
use nexus_chat::{ClientConfig, ClientError, SessionClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

/// How long `send` waits for the server to echo the message back.
const ECHO_WAIT: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
#[command(name = "nexus-chat", about = "Nexus Chat session client")]
struct Cli {
    #[arg(long, env = "NEXUS_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "NEXUS_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Messages kept in memory; 0 keeps everything.
    #[arg(long, env = "NEXUS_LOG_RETENTION")]
    log_retention: Option<String>,

    /// Keep the session in memory only.
    #[arg(long, default_value_t = false)]
    no_persist: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(CredentialArgs),
    Register(CredentialArgs),
    Logout,
    Whoami,
    History,
    Send {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Upload {
        path: PathBuf,
    },
    Chat,
}

#[derive(Args, Debug)]
struct CredentialArgs {
    username: String,

    #[arg(long, env = "NEXUS_PASSWORD")]
    password: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error.user_message());
            tracing::debug!(%error, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    if let Some(raw) = cli.log_retention.as_deref() {
        config.log_retention = parse_retention(Some(raw));
    }

    let store: Box<dyn SessionStore> = if cli.no_persist {
        Box::new(MemorySessionStore::default())
    } else {
        Box::new(FileSessionStore::new(config.session_file.clone()))
    };
    let mut client = SessionClient::new(config, store)?;

    match cli.command {
        Command::Login(args) => {
            let session = client.authenticate(&args.username, &args.password).await?;
            println!("logged in as {}", session.user_id().unwrap_or(&args.username));
            Ok(())
        }
        Command::Register(args) => {
            client.register(&args.username, &args.password).await?;
            println!("registered {}; log in to continue", args.username);
            Ok(())
        }
        Command::Logout => {
            client.logout().await?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            match client.session().user_id().filter(|_| client.session().is_authenticated()) {
                Some(user_id) => println!("{user_id}"),
                None => println!("not logged in"),
            }
            Ok(())
        }
        Command::History => {
            client.load_history().await?;
            print_messages(&client.messages().await, client.session().user_id());
            Ok(())
        }
        Command::Send { text } => run_send(&mut client, &text.join(" ")).await,
        Command::Upload { path } => {
            let file = UploadFile::from_path(&path).await?;
            let result = client.upload_image(file).await?;
            println!("{result}");
            Ok(())
        }
        Command::Chat => run_chat(&mut client).await,
    }
}

async fn run_send(client: &mut SessionClient, text: &str) -> Result<(), ClientError> {
    let mut inbound = client.subscribe_messages();
    client.connect().await?;

    if !client.send_text(text) {
        client.disconnect().await;
        eprintln!("nothing sent");
        return Ok(());
    }

    let own = client.session().user_id().map(ToOwned::to_owned);
    let echoed = tokio::time::timeout(ECHO_WAIT, async {
        loop {
            match inbound.recv().await {
                Ok(msg) if msg.content.as_deref() == Some(text) && own.as_deref() == Some(msg.user_id.as_str()) => {
                    return true;
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return false,
            }
        }
    })
    .await
    .unwrap_or(false);

    client.disconnect().await;
    if echoed {
        println!("sent");
    } else {
        println!("sent (no echo received)");
    }
    Ok(())
}

async fn run_chat(client: &mut SessionClient) -> Result<(), ClientError> {
    if !client.session().is_authenticated() {
        return Err(ClientError::NotAuthenticated);
    }

    let mut inbound = client.subscribe_messages();
    let mut status = client.subscribe_status();
    client.start().await;
    print_messages(&client.messages().await, client.session().user_id());
    if client.connection_status() != ConnectionStatus::Open {
        eprintln!("live connection unavailable; messages will not arrive");
    }

    let current_user = client.session().user_id().map(ToOwned::to_owned);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            msg = inbound.recv() => match msg {
                Ok(msg) => println!("{}", Bubble::new(&msg, current_user.as_deref())),
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "renderer fell behind"),
                Err(RecvError::Closed) => break,
            },
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                if *status.borrow_and_update() == ConnectionStatus::Closed {
                    eprintln!("connection closed; restart chat to reconnect");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line == "/quit" {
                    break;
                }
                if let Some(path) = line.strip_prefix("/upload ") {
                    match UploadFile::from_path(Path::new(path.trim())).await {
                        Ok(file) => {
                            // Failures are already logged by the client.
                            let _ = client.upload_image(file).await;
                        }
                        Err(error) => eprintln!("cannot read {path}: {error}"),
                    }
                    continue;
                }
                client.send_text(line);
            }
        }
    }

    client.disconnect().await;
    Ok(())
}

fn print_messages(messages: &[ChatMessage], current_user: Option<&str>) {
    if messages.is_empty() {
        println!("No messages yet.");
        return;
    }
    for msg in messages {
        println!("{}", Bubble::new(msg, current_user));
    }
}
