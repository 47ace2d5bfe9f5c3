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

// primary opcode fields (bits 31..26)
pub const OP_SPECIAL: u32 = 0x00;
pub const OP_REGIMM: u32 = 0x01;
pub const OP_J: u32 = 0x02;
pub const OP_JAL: u32 = 0x03;
pub const OP_BEQ: u32 = 0x04;
pub const OP_BNE: u32 = 0x05;
pub const OP_BLEZ: u32 = 0x06;
pub const OP_BGTZ: u32 = 0x07;
pub const OP_ADDI: u32 = 0x08;
pub const OP_ADDIU: u32 = 0x09;
pub const OP_SLTI: u32 = 0x0A;
pub const OP_SLTIU: u32 = 0x0B;
pub const OP_ANDI: u32 = 0x0C;
pub const OP_ORI: u32 = 0x0D;
pub const OP_XORI: u32 = 0x0E;
pub const OP_LUI: u32 = 0x0F;
pub const OP_COP1: u32 = 0x11;
pub const OP_LB: u32 = 0x20;
pub const OP_LH: u32 = 0x21;
pub const OP_LWL: u32 = 0x22;
pub const OP_LW: u32 = 0x23;
pub const OP_LBU: u32 = 0x24;
pub const OP_LHU: u32 = 0x25;
pub const OP_LWR: u32 = 0x26;
pub const OP_SB: u32 = 0x28;
pub const OP_SH: u32 = 0x29;
pub const OP_SWL: u32 = 0x2A;
pub const OP_SW: u32 = 0x2B;
pub const OP_SWR: u32 = 0x2E;
pub const OP_LL: u32 = 0x30;
pub const OP_LWC1: u32 = 0x31;
pub const OP_LDC1: u32 = 0x35;
pub const OP_SC: u32 = 0x38;
pub const OP_SWC1: u32 = 0x39;
pub const OP_SDC1: u32 = 0x3D;

// SPECIAL function fields (bits 5..0)
pub const FUNCT_SLL: u32 = 0x00;
pub const FUNCT_SRL: u32 = 0x02;
pub const FUNCT_SRA: u32 = 0x03;
pub const FUNCT_SLLV: u32 = 0x04;
pub const FUNCT_SRLV: u32 = 0x06;
pub const FUNCT_SRAV: u32 = 0x07;
pub const FUNCT_JR: u32 = 0x08;
pub const FUNCT_JALR: u32 = 0x09;
pub const FUNCT_SYSCALL: u32 = 0x0C;
pub const FUNCT_BREAK: u32 = 0x0D;
pub const FUNCT_MFHI: u32 = 0x10;
pub const FUNCT_MTHI: u32 = 0x11;
pub const FUNCT_MFLO: u32 = 0x12;
pub const FUNCT_MTLO: u32 = 0x13;
pub const FUNCT_MULT: u32 = 0x18;
pub const FUNCT_MULTU: u32 = 0x19;
pub const FUNCT_DIV: u32 = 0x1A;
pub const FUNCT_DIVU: u32 = 0x1B;
pub const FUNCT_ADD: u32 = 0x20;
pub const FUNCT_ADDU: u32 = 0x21;
pub const FUNCT_SUB: u32 = 0x22;
pub const FUNCT_SUBU: u32 = 0x23;
pub const FUNCT_AND: u32 = 0x24;
pub const FUNCT_OR: u32 = 0x25;
pub const FUNCT_XOR: u32 = 0x26;
pub const FUNCT_NOR: u32 = 0x27;
pub const FUNCT_SLT: u32 = 0x2A;
pub const FUNCT_SLTU: u32 = 0x2B;

// REGIMM rt fields (bits 20..16)
pub const RT_BLTZ: u32 = 0x00;
pub const RT_BGEZ: u32 = 0x01;
pub const RT_TGEI: u32 = 0x08;
pub const RT_TGEIU: u32 = 0x09;
pub const RT_TLTI: u32 = 0x0A;
pub const RT_TLTIU: u32 = 0x0B;
pub const RT_TEQI: u32 = 0x0C;
pub const RT_TNEI: u32 = 0x0E;
pub const RT_BLTZAL: u32 = 0x10;
pub const RT_BGEZAL: u32 = 0x11;

// COP1 rs sub-opcodes (bits 25..21)
pub const COP1_MF: u32 = 0x00;
pub const COP1_MT: u32 = 0x04;
pub const COP1_BC: u32 = 0x08;

// COP1 format fields
pub const FMT_S: u32 = 0x10;
pub const FMT_D: u32 = 0x11;
pub const FMT_W: u32 = 0x14;

// COP1 function fields
pub const FUNCT_FP_ADD: u32 = 0x00;
pub const FUNCT_FP_SUB: u32 = 0x01;
pub const FUNCT_FP_MUL: u32 = 0x02;
pub const FUNCT_FP_DIV: u32 = 0x03;
pub const FUNCT_FP_SQRT: u32 = 0x04;
pub const FUNCT_FP_ABS: u32 = 0x05;
pub const FUNCT_FP_MOV: u32 = 0x06;
pub const FUNCT_FP_NEG: u32 = 0x07;
pub const FUNCT_CVT_S: u32 = 0x20;
pub const FUNCT_CVT_D: u32 = 0x21;
pub const FUNCT_CVT_W: u32 = 0x24;
pub const FUNCT_C_EQ: u32 = 0x32;
pub const FUNCT_C_LT: u32 = 0x3C;
pub const FUNCT_C_LE: u32 = 0x3E;
