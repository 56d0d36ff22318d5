use std::time::Duration;

use clap::Parser;
use futures::stream::SplitSink;
use futures::{SinkExt, Stream, StreamExt};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;

use pathwise_proto::line::LineCodec;
use pathwise_proto::messages::{greeting, is_farewell, is_termination, TERMINATION_PHRASE};

type LineSink = SplitSink<Framed<TcpStream, LineCodec>, String>;

/// How long to wait for the server's farewell after saying goodbye.
const FAREWELL_WAIT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "pathwise-cli", about = "Interactive client for the pathwise graph server")]
struct Cli {
    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 50000)]
    port: u16,

    /// Name to greet the server with. Prompted for when absent.
    #[arg(short, long)]
    name: Option<String>,
}

// ---------------------------------------------------------------------------
// Input handling
// ---------------------------------------------------------------------------

/// Trim and upper-case a line typed by the user. Blank input yields `None`.
fn normalize_input(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// The client half of the handshake.
fn greeting_line(name: &str) -> String {
    greeting(&name.trim().to_uppercase())
}

// ---------------------------------------------------------------------------
// Networking
// ---------------------------------------------------------------------------

/// Print every server line until the farewell arrives or the server hangs up.
async fn print_responses<S>(mut lines: S)
where
    S: Stream<Item = Result<String, std::io::Error>> + Unpin,
{
    while let Some(frame) = lines.next().await {
        match frame {
            Ok(line) => {
                println!("{}", line);
                if is_farewell(&line) {
                    return;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        }
    }
    println!("(connection closed by server)");
}

/// The reader stops once the server has said goodbye or closed the socket.
fn session_ended(reader: &JoinHandle<()>) -> bool {
    reader.is_finished()
}

async fn say_goodbye(sink: &mut LineSink, reader: JoinHandle<()>) {
    if let Err(e) = sink.send(TERMINATION_PHRASE.to_string()).await {
        eprintln!("Error: {}", e);
        return;
    }
    if tokio::time::timeout(FAREWELL_WAIT, reader).await.is_err() {
        eprintln!("(no farewell from server)");
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let addr = format!("{}:{}", cli.host, cli.port);
    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    let (mut sink, mut lines) = Framed::new(stream, LineCodec::new()).split();

    // The server speaks first.
    match lines.next().await {
        Some(Ok(hello)) => println!("{}", hello),
        Some(Err(e)) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        None => {
            eprintln!("Error: connection closed before greeting");
            std::process::exit(1);
        }
    }

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to initialize readline: {}", e);
            std::process::exit(1);
        }
    };

    let name = match cli.name {
        Some(name) => name,
        None => match rl.readline("name> ") {
            Ok(name) => name,
            Err(_) => return,
        },
    };
    if let Err(e) = sink.send(greeting_line(&name)).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let reader = tokio::spawn(print_responses(lines));

    loop {
        if session_ended(&reader) {
            break;
        }
        match rl.readline("pathwise> ") {
            Ok(line) => {
                let Some(input) = normalize_input(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(&input);

                if is_termination(&input) {
                    say_goodbye(&mut sink, reader).await;
                    return;
                }
                if let Err(e) = sink.send(input).await {
                    eprintln!("Error: {}", e);
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: print hint and continue.
                println!("(Type '{}' or press Ctrl-D to leave)", TERMINATION_PHRASE);
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D: leave politely.
                say_goodbye(&mut sink, reader).await;
                return;
            }
            Err(e) => {
                eprintln!("Readline error: {}", e);
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
