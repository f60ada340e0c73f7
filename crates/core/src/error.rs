use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    /// A header line carried no `(` or `<` to delimit the sender id.
    #[error("malformed header on line {line_no}: {line:?} has no '(' or '<' before the sender id")]
    MalformedHeader { line_no: usize, line: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
