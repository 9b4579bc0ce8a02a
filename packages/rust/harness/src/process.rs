//! Child processes and server readiness.

use std::io::{ErrorKind, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::path::Path;
use std::process::{ChildStdin, Command, Stdio};
use std::time::Duration;

use tracing::{debug, info, instrument};

use oqsgen_shared::{GeneratorError, Result};

/// Readiness polls before a server is declared dead.
pub const SERVER_START_ATTEMPTS: u32 = 10;

/// Pause between readiness polls.
pub const SERVER_START_BACKOFF: Duration = Duration::from_secs(1);

/// Client output proving the TLS handshake completed.
pub const HANDSHAKE_MARKER: &str = "SSL handshake has read";

/// Run `program args...` in `working_dir`, feeding `input` on stdin.
///
/// Returns stdout followed by stderr. Any exit code other than
/// `expected_code` is an error carrying the captured output.
#[instrument(skip_all, fields(program = %program))]
pub fn run_subprocess(
    program: &str,
    args: &[String],
    working_dir: &Path,
    input: Option<&[u8]>,
    expected_code: i32,
) -> Result<String> {
    let command_line = std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    info!("{} > {command_line}", working_dir.display());

    let mut child = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| GeneratorError::io(program, e))?;

    // stdin is fed on its own thread while the output pipes drain, otherwise
    // a child echoing a large input blocks on a full stdout pipe.
    let stdin = child.stdin.take();
    let output = std::thread::scope(|scope| {
        let writer = scope.spawn(move || feed_stdin(stdin, input));
        let output = child.wait_with_output();
        let fed = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
        fed.and(output)
    })
    .map_err(|e| GeneratorError::io(program, e))?;
    let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
    captured.push_str(&String::from_utf8_lossy(&output.stderr));

    let actual = output.status.code();
    if actual != Some(expected_code) {
        return Err(GeneratorError::ChildProcessUnexpectedExit {
            command: command_line,
            expected: expected_code,
            actual,
            output: captured,
        });
    }
    Ok(captured)
}

/// Write `input` and close stdin. A child that exits without reading all of
/// it is not an error here; its exit code decides.
fn feed_stdin(stdin: Option<ChildStdin>, input: Option<&[u8]>) -> std::io::Result<()> {
    let (Some(mut stdin), Some(bytes)) = (stdin, input) else {
        return Ok(());
    };
    match stdin.write_all(bytes) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Poll `probe` until it reports ready, sleeping `backoff` between tries.
pub fn wait_for_server(
    attempts: u32,
    backoff: Duration,
    mut probe: impl FnMut() -> bool,
) -> Result<u32> {
    for attempt in 1..=attempts {
        if probe() {
            debug!(attempt, "server ready");
            return Ok(attempt);
        }
        if attempt < attempts {
            std::thread::sleep(backoff);
        }
    }
    Err(GeneratorError::ServerStartTimeout { attempts })
}

/// Whether something accepts TCP connections on localhost `port`.
pub fn port_accepts(port: u16) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpStream::connect_timeout(&addr, Duration::from_millis(500)).is_ok()
}

pub fn handshake_succeeded(client_output: &str) -> bool {
    client_output.contains(HANDSHAKE_MARKER)
}
