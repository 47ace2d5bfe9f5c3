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

use crate::assembler::encoder::constants::*;

// SPECIAL(6) | rs(5) | rt(5) | rd(5) | sa(5) | funct(6)
pub fn r_type(funct: u32, rs: u8, rt: u8, rd: u8, shamt: u32) -> u32 {
    (OP_SPECIAL << 26)
        | ((rs as u32) << 21)
        | ((rt as u32) << 16)
        | ((rd as u32) << 11)
        | ((shamt & 0x1F) << 6)
        | funct
}

// op(6) | rs(5) | rt(5) | imm16(16)
pub fn i_type(op: u32, rs: u8, rt: u8, imm: u32) -> u32 {
    (op << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | (imm & 0xFFFF)
}

// op(6) | target26(26)
pub fn j_type(op: u32, target: u32) -> u32 {
    (op << 26) | (target & 0x03FF_FFFF)
}

// 000001 | rs(5) | rt-field(5) | imm16(16)
pub fn regimm(rs: u8, rt_field: u32, imm: u32) -> u32 {
    (OP_REGIMM << 26) | ((rs as u32) << 21) | (rt_field << 16) | (imm & 0xFFFF)
}

// 010001 | fmt(5) | ft(5) | fs(5) | fd(5) | funct(6)
pub fn cop1(fmt: u32, ft: u8, fs: u8, fd: u8, funct: u32) -> u32 {
    (OP_COP1 << 26)
        | (fmt << 21)
        | ((ft as u32) << 16)
        | ((fs as u32) << 11)
        | ((fd as u32) << 6)
        | funct
}

// 010001 | sub-op(5) | rt(5) | fs(5) | zeros
pub fn cop1_move(sub_op: u32, rt: u8, fs: u8) -> u32 {
    (OP_COP1 << 26) | (sub_op << 21) | ((rt as u32) << 16) | ((fs as u32) << 11)
}

// 010001 | 01000 | cc(3) 0 tf | offset16
pub fn cop1_branch(flag: u32, branch_on_true: bool, offset: u32) -> u32 {
    let condition = (flag << 2) | (branch_on_true as u32);
    (OP_COP1 << 26) | (COP1_BC << 21) | (condition << 16) | (offset & 0xFFFF)
}
