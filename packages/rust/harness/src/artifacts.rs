//! Test artifact naming and TLS tool command lines.

use std::path::{Path, PathBuf};

/// Key and certificate files for one signature algorithm on one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    dir: PathBuf,
    prefix: String,
}

impl ArtifactSet {
    /// Files live in `dir` and are named `<worker>_<sig>_<role>`.
    pub fn new(dir: impl Into<PathBuf>, worker: &str, sig: &str) -> Self {
        Self {
            dir: dir.into(),
            prefix: format!("{worker}_{sig}"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, role: &str) -> PathBuf {
        self.dir.join(format!("{}_{role}", self.prefix))
    }

    pub fn ca_cert(&self) -> PathBuf {
        self.file("CA.crt")
    }

    pub fn ca_key(&self) -> PathBuf {
        self.file("CA.key")
    }

    pub fn server_cert(&self) -> PathBuf {
        self.file("srv.crt")
    }

    pub fn server_key(&self) -> PathBuf {
        self.file("srv.key")
    }

    pub fn server_csr(&self) -> PathBuf {
        self.file("srv.csr")
    }

    pub fn server_pubkey(&self) -> PathBuf {
        self.file("srv.pubk")
    }
}

/// Split the group list into two colon-joined halves; the server is
/// started once per half. The first half gets the shorter share.
pub fn split_groups<S: AsRef<str>>(groups: &[S]) -> (String, String) {
    let (first, second) = groups.split_at(groups.len() / 2);
    let join = |part: &[S]| {
        part.iter()
            .map(|g| g.as_ref())
            .collect::<Vec<_>>()
            .join(":")
    };
    (join(first), join(second))
}

/// `s_server` arguments: TLS 1.3 on an ephemeral port, x25519 plus `groups`.
pub fn server_args(artifacts: &ArtifactSet, groups: &str) -> Vec<String> {
    let mut offered = String::from("x25519");
    if !groups.is_empty() {
        offered.push(':');
        offered.push_str(groups);
    }
    vec![
        "s_server".into(),
        "-cert".into(),
        artifacts.server_cert().display().to_string(),
        "-key".into(),
        artifacts.server_key().display().to_string(),
        "-CAfile".into(),
        artifacts.ca_cert().display().to_string(),
        "-tls1_3".into(),
        "-quiet".into(),
        "-groups".into(),
        offered,
        "-accept".into(),
        "0".into(),
    ]
}

/// `s_client` arguments forcing `group` against a server on `port`.
pub fn client_args(artifacts: &ArtifactSet, group: &str, port: u16) -> Vec<String> {
    vec![
        "s_client".into(),
        "-groups".into(),
        group.into(),
        "-CAfile".into(),
        artifacts.ca_cert().display().to_string(),
        "-verify_return_error".into(),
        "-connect".into(),
        format!("localhost:{port}"),
    ]
}
