pub mod commands;
pub mod config;
pub mod discovery;
pub mod editor;
pub mod invocation;
pub mod lens;
pub mod resolver;
pub mod runner;
pub mod scanner;
pub mod session;
pub mod terminal;
pub mod uri;
pub mod workspace;

pub use commands::{execute, execute_json, run_command_handler, stop_command_handler, RunScope, TestCommand};
pub use config::{Config, ConfigError, DocumentsConfig, RunnerConfig, TerminalConfig};
pub use discovery::{discover, scan_file, DiscoveryError, FileDeclarations};
pub use editor::{ActiveEditor, Document, EditorContext, MessageSink};
pub use invocation::{shell_quote, Invocation};
pub use lens::{provide_code_lenses, CodeLens};
pub use resolver::{resolve_document_uri, resolve_run_target, CommandArgs, RunTarget};
pub use runner::{RunOptions, RunnerError, TestRunner};
pub use scanner::{build_exact_pattern, escape_for_regex, scan_document, scan_line, TestDeclaration};
pub use session::{Session, SessionRegistry, TeardownReport};
pub use terminal::{ProcessTerminal, ProcessTerminalHost, Terminal, TerminalError, TerminalHost, TerminalId, TerminalOptions};
pub use uri::{FileUri, UriError};
pub use workspace::{WorkspaceFolder, WorkspaceFolders, WorkspaceKey, WorkspaceResolver};
