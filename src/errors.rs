use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AssemblyError {
    #[error("Syntax Error: {0}")]
    PestError(#[from] pest::error::Error<crate::parser::Rule>),

    #[error("Syntax Error on line {line}: {reason}")]
    InvalidSyntax { line: usize, reason: String },

    #[error("Invalid Directive on line {line}: {reason}")]
    InvalidDirective { line: usize, reason: String },

    #[error("Invalid Instruction on line {line}: {reason}")]
    InvalidInstruction { line: usize, reason: String },

    #[error("Invalid escape sequence on line {line}: {reason}")]
    InvalidEscapeSequence { line: usize, reason: String },

    #[error("Undefined symbol \"{name}\" on line {line}")]
    UndefinedSymbol { line: usize, name: String },

    #[error("Duplicate symbol \"{name}\" on line {line}")]
    DuplicateSymbol { line: usize, name: String },

    #[error("Branch out of range on line {line}: {reason}")]
    BranchOutOfRange { line: usize, reason: String },

    #[error("Segment misuse on line {line}: {reason}")]
    SegmentMisuse { line: usize, reason: String },
}
