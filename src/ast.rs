/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

// Register index of the assembler temporary ($at). Compiler-generated
// expansion code owns this register.
pub const AT: u8 = 1;

// Register index of the zero register.
pub const ZERO: u8 = 0;

// Register index of the link register ($ra).
pub const RA: u8 = 31;

const GPR_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp", "fp",
    "ra",
];

/// Translate the text of a register operand (without the leading `$`) into
/// its index. Accepts numeric form (`0`-`31`), ABI names, and the floating
/// point bank (`f0`-`f31`); both banks share the index space 0-31.
pub fn register_index(name: &str) -> Option<u8> {
    if let Some(num) = name.strip_prefix('f') {
        if let Ok(idx) = num.parse::<u8>() {
            if idx < 32 {
                return Some(idx);
            }
        }
    }

    if let Ok(idx) = name.parse::<u8>() {
        if idx < 32 {
            return Some(idx);
        }
        return None;
    }

    GPR_NAMES.iter().position(|n| *n == name).map(|i| i as u8)
}

// --- Memory segments ---

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Segment {
    Text,
    Data,
    KText,
    KData,
}

impl Segment {
    // architectural default base address
    pub fn base(self) -> u32 {
        match self {
            Segment::Text => 0x0400_0000,
            Segment::Data => 0x1000_0000,
            Segment::KText => 0x8000_0000,
            Segment::KData => 0x9000_0000,
        }
    }

    // only text and ktext may hold instruction words
    pub fn holds_code(self) -> bool {
        matches!(self, Segment::Text | Segment::KText)
    }

    pub fn name(self) -> &'static str {
        match self {
            Segment::Text => "text",
            Segment::Data => "data",
            Segment::KText => "ktext",
            Segment::KData => "kdata",
        }
    }
}

// --- Operands ---

// Represents all surface forms a single instruction argument can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Register(u8),
    Immediate(i64),
    Label(String),
    LabelPlusImm(String, i32),         // e.g., msg+4
    Indirect(u8),                      // e.g., ($t0)
    OffsetBase(i64, u8),               // e.g., 8($sp)
    LabelBase(String, u8),             // e.g., msg($t0)
    LabelPlusImmBase(String, i32, u8), // e.g., msg+4($t0)
}

/// The closed set of operand-list shapes. A mnemonic declares the subset it
/// accepts as a mask; the operand parser selects the first member of this
/// enumeration (in declaration order) that fits the written operands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Archetype {
    #[default]
    NoParams,
    Reg,
    Imm,
    RegReg,
    RegImm,
    RegRegReg,
    RegRegImm,
    ImmRegReg,
    Label,
    ImmLabel,
    RegLabel,
    RegRegLabel,
    RegImmLabel,
    RegMemReg,
    RegOffsetForReg,
    RegLabelAsOffsetReg,
    RegLabelPlusImm,
    RegLabelPlusImmOffsetForReg,
    // sentinel carried by tokens synthesized during pseudo expansion
    CompilerGenerated,
}

/// The decoded operand fields of one instruction. Which fields are meaningful
/// depends on the archetype; unused fields stay at their defaults. The
/// `resolved` slot is written during pass 2 when `label` is present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperandBundle {
    pub archetype: Archetype,
    pub reg1: u8,
    pub reg2: u8,
    pub reg3: u8,
    pub imm: i32,
    pub offset: i32,
    pub label: Option<String>,
    pub resolved: u32,
}

impl OperandBundle {
    /// Bundle for a compiler-generated three-register instruction.
    pub fn gen_rrr(reg1: u8, reg2: u8, reg3: u8) -> Self {
        OperandBundle {
            archetype: Archetype::CompilerGenerated,
            reg1,
            reg2,
            reg3,
            ..Default::default()
        }
    }

    /// Bundle for a compiler-generated register/immediate instruction.
    pub fn gen_rri(reg1: u8, reg2: u8, imm: i32) -> Self {
        OperandBundle {
            archetype: Archetype::CompilerGenerated,
            reg1,
            reg2,
            imm,
            ..Default::default()
        }
    }

    /// Bundle for a compiler-generated labelled instruction (branch or
    /// absolute reference); `imm` carries the constant addend, if any.
    pub fn gen_label(reg1: u8, reg2: u8, label: String, imm: i32) -> Self {
        OperandBundle {
            archetype: Archetype::CompilerGenerated,
            reg1,
            reg2,
            imm,
            label: Some(label),
            ..Default::default()
        }
    }

    /// Bundle for a compiler-generated memory access `reg1, offset(reg2)`.
    pub fn gen_mem(reg1: u8, reg2: u8, offset: i32) -> Self {
        OperandBundle {
            archetype: Archetype::CompilerGenerated,
            reg1,
            reg2,
            offset,
            ..Default::default()
        }
    }
}

// --- Instructions ---

// Enum representing every real (directly encodable) instruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Opcode {
    // SPECIAL (R-type)
    Sll,
    Srl,
    Sra,
    Sllv,
    Srlv,
    Srav,
    Jr,
    Jalr,
    Syscall,
    Break,
    Mfhi,
    Mthi,
    Mflo,
    Mtlo,
    Mult,
    Multu,
    Div,
    Divu,
    Add,
    Addu,
    Sub,
    Subu,
    And,
    Or,
    Xor,
    Nor,
    Slt,
    Sltu,

    // I-type arithmetic/logic
    Addi,
    Addiu,
    Slti,
    Sltiu,
    Andi,
    Ori,
    Xori,
    Lui,

    // branches
    Beq,
    Bne,
    Blez,
    Bgtz,
    Bgez,
    Bltz,
    Bgezal,
    Bltzal,

    // REGIMM trap-immediates
    Tgei,
    Tgeiu,
    Tlti,
    Tltiu,
    Teqi,
    Tnei,

    // jumps
    J,
    Jal,

    // loads/stores
    Lb,
    Lh,
    Lwl,
    Lw,
    Lbu,
    Lhu,
    Lwr,
    Ll,
    Sb,
    Sh,
    Swl,
    Sw,
    Swr,
    Sc,
    Lwc1,
    Swc1,
    Ldc1,
    Sdc1,

    // COP1 arithmetic
    AddS,
    AddD,
    SubS,
    SubD,
    MulS,
    MulD,
    DivS,
    DivD,
    AbsS,
    AbsD,
    NegS,
    NegD,
    MovS,
    MovD,
    SqrtS,
    SqrtD,

    // COP1 conversions
    CvtSD,
    CvtSW,
    CvtDS,
    CvtDW,
    CvtWS,
    CvtWD,

    // COP1 compares and condition branches
    CEqS,
    CEqD,
    CLtS,
    CLtD,
    CLeS,
    CLeD,
    Bc1f,
    Bc1t,

    // COP1 register moves
    Mfc1,
    Mtc1,
}

impl Opcode {
    /// Memory-access instructions take their 16-bit field from the parsed
    /// offset rather than the immediate.
    pub fn is_memory_access(self) -> bool {
        matches!(
            self,
            Opcode::Lb
                | Opcode::Lh
                | Opcode::Lwl
                | Opcode::Lw
                | Opcode::Lbu
                | Opcode::Lhu
                | Opcode::Lwr
                | Opcode::Ll
                | Opcode::Sb
                | Opcode::Sh
                | Opcode::Swl
                | Opcode::Sw
                | Opcode::Swr
                | Opcode::Sc
                | Opcode::Lwc1
                | Opcode::Swc1
                | Opcode::Ldc1
                | Opcode::Sdc1
        )
    }
}

// --- Fixups ---

/// How a token's label reference turns into its 16- or 26-bit field during
/// pass 2. The encoder ORs the resolved value in uniformly; the fixup kind
/// decides what that value means.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Fixup {
    /// No label; the field comes straight from the bundle.
    #[default]
    None,
    /// Signed word offset relative to the following instruction.
    Branch,
    /// Absolute target address, low 2 bits discarded, 26 bits packed.
    Jump,
    /// High 16 bits of the absolute address plus constant addend.
    Hi16,
    /// Low 16 bits of the absolute address plus constant addend.
    Lo16,
}

// --- Directives ---

/// One argument of a `.word` list. `label` is resolved to its address in
/// pass 2 and replaces `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct WordItem {
    pub value: u32,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind {
    Byte(Vec<u8>),
    Half(Vec<u16>),
    Word(Vec<WordItem>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    // .asciiz folds its terminating NUL into the stored bytes
    Ascii(Vec<u8>),
    Space(u32),
    Align(u32),
    Segment(Segment, Option<u32>),
    Globl(String),
}

impl DirectiveKind {
    /// Bytes this directive reserves in its segment. Alignment and segment
    /// switches move the cursor through their own layout rules instead.
    pub fn byte_size(&self) -> u32 {
        match self {
            DirectiveKind::Byte(items) => items.len() as u32,
            DirectiveKind::Half(items) => items.len() as u32 * 2,
            DirectiveKind::Word(items) => items.len() as u32 * 4,
            DirectiveKind::Float(items) => items.len() as u32 * 4,
            DirectiveKind::Double(items) => items.len() as u32 * 8,
            DirectiveKind::Ascii(bytes) => bytes.len() as u32,
            DirectiveKind::Space(count) => *count,
            DirectiveKind::Align(_) | DirectiveKind::Segment(..) | DirectiveKind::Globl(_) => 0,
        }
    }
}

// --- Tokens ---

/// A real instruction with its decoded operands, fixup kind, and the address
/// assigned in pass 1.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionToken {
    pub opcode: Opcode,
    pub operands: OperandBundle,
    pub fixup: Fixup,
    pub address: u32,
    pub line: usize,
}

/// A pseudo-instruction carried through unexpanded. Only produced when
/// expansion is disabled; downstream consumers treat it as an opaque record.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoToken {
    pub mnemonic: String,
    pub operands: OperandBundle,
    pub address: u32,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveToken {
    pub kind: DirectiveKind,
    pub address: u32,
    pub line: usize,
}

// A label definition site.
#[derive(Debug, Clone, PartialEq)]
pub struct TagToken {
    pub name: String,
    pub line: usize,
}

// The common unit of the internal stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Directive(DirectiveToken),
    Instruction(InstructionToken),
    Pseudoinstruction(PseudoToken),
    Tag(TagToken),
}

impl Token {
    pub fn line(&self) -> usize {
        match self {
            Token::Directive(t) => t.line,
            Token::Instruction(t) => t.line,
            Token::Pseudoinstruction(t) => t.line,
            Token::Tag(t) => t.line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_index_numeric() {
        assert_eq!(register_index("0"), Some(0));
        assert_eq!(register_index("31"), Some(31));
        assert_eq!(register_index("32"), None);
    }

    #[test]
    fn test_register_index_names() {
        assert_eq!(register_index("zero"), Some(0));
        assert_eq!(register_index("at"), Some(1));
        assert_eq!(register_index("t0"), Some(8));
        assert_eq!(register_index("sp"), Some(29));
        assert_eq!(register_index("ra"), Some(31));
        assert_eq!(register_index("bogus"), None);
    }

    #[test]
    fn test_register_index_float_bank() {
        assert_eq!(register_index("f0"), Some(0));
        assert_eq!(register_index("f12"), Some(12));
        assert_eq!(register_index("f31"), Some(31));
        assert_eq!(register_index("f32"), None);
    }

    #[test]
    fn test_segment_bases() {
        assert_eq!(Segment::Text.base(), 0x0400_0000);
        assert_eq!(Segment::Data.base(), 0x1000_0000);
        assert_eq!(Segment::KText.base(), 0x8000_0000);
        assert_eq!(Segment::KData.base(), 0x9000_0000);
        assert!(Segment::Text.holds_code());
        assert!(Segment::KText.holds_code());
        assert!(!Segment::Data.holds_code());
    }

    #[test]
    fn test_directive_sizes() {
        assert_eq!(DirectiveKind::Byte(vec![1, 2, 3]).byte_size(), 3);
        assert_eq!(DirectiveKind::Half(vec![1, 2]).byte_size(), 4);
        assert_eq!(
            DirectiveKind::Word(vec![WordItem {
                value: 0,
                label: None
            }])
            .byte_size(),
            4
        );
        assert_eq!(DirectiveKind::Double(vec![1.0]).byte_size(), 8);
        assert_eq!(DirectiveKind::Space(10).byte_size(), 10);
        assert_eq!(DirectiveKind::Align(3).byte_size(), 0);
    }
}
