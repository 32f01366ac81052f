use thiserror::Error;

/// A single edge whose endpoint does not name a node in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEdge {
    pub edge_id: String,
    pub missing_node_id: String,
}

impl std::fmt::Display for DanglingEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> missing '{}'", self.edge_id, self.missing_node_id)
    }
}

/// Integrity violations raised by the graph store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' already exists in the graph")]
    DuplicateNode(String),

    #[error("Edge '{0}' already exists in the graph")]
    DuplicateEdge(String),

    #[error("Edge '{edge_id}' references node '{missing_node_id}', which is not in the graph")]
    DanglingEdge {
        edge_id: String,
        missing_node_id: String,
    },

    #[error("Graph has {} dangling edge(s): {}", .0.len(), format_dangling(.0))]
    InvalidGraph(Vec<DanglingEdge>),
}

fn format_dangling(edges: &[DanglingEdge]) -> String {
    edges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from the board registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board '{0}' not found")]
    BoardNotFound(String),

    #[error("No board is currently active")]
    NoActiveBoard,

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors from the execution status tracker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Cannot mark the canvas as executing without an execution descriptor")]
    NoExecution,

    #[error("Execution '{0}' is already running")]
    AlreadyRunning(String),

    #[error("Update for execution '{received}' does not match running execution '{running}'")]
    ExecutionMismatch { running: String, received: String },
}

/// Errors reading or writing the persisted subset.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize persisted state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to deserialize persisted state: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Persisted state version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("No migration registered from version {0}")]
    Migration(u32),
}

/// Failures from remote resource APIs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Remote resource '{0}' not found")]
    NotFound(String),

    #[error("Backend responded with status {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Failed to decode remote response: {0}")]
    Decode(String),
}

/// Errors surfaced by the canvas service object.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Invalid store configuration: {0}")]
    Config(String),
}
