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

use crate::errors::AssemblyError;

pub fn fits_signed16(value: i32) -> bool {
    (i16::MIN as i32..=i16::MAX as i32).contains(&value)
}

pub fn fits_unsigned16(value: i32) -> bool {
    (0..=u16::MAX as i32).contains(&value)
}

// double-precision operands must name the even register of an aligned pair
pub fn check_even_registers(registers: &[u8], line: usize) -> Result<(), AssemblyError> {
    for reg in registers {
        if reg % 2 != 0 {
            return Err(AssemblyError::InvalidInstruction {
                line,
                reason: format!(
                    "Double-precision operands require even register indices, got ${}",
                    reg
                ),
            });
        }
    }
    Ok(())
}

// condition flag of bc1f/bc1t and the FP compares
pub fn check_flag_range(flag: i32, line: usize) -> Result<(), AssemblyError> {
    if !(0..=7).contains(&flag) {
        return Err(AssemblyError::InvalidInstruction {
            line,
            reason: format!("Condition flag must be between 0 and 7, got {}", flag),
        });
    }
    Ok(())
}

pub fn check_shift_amount(amount: i32, line: usize) -> Result<(), AssemblyError> {
    if !(0..=31).contains(&amount) {
        return Err(AssemblyError::InvalidInstruction {
            line,
            reason: format!("Shift amount must be between 0 and 31, got {}", amount),
        });
    }
    Ok(())
}

pub fn check_unsigned16(value: i32, line: usize) -> Result<(), AssemblyError> {
    if !fits_unsigned16(value) {
        return Err(AssemblyError::InvalidInstruction {
            line,
            reason: format!(
                "Value must be an unsigned 16 bit value, (max: {}, min: 0)",
                u16::MAX
            ),
        });
    }
    Ok(())
}

// doubleword transfers write a register pair, so $ra cannot be the low half
pub fn check_pair_destination(reg: u8, line: usize) -> Result<(), AssemblyError> {
    if reg == 31 {
        return Err(AssemblyError::InvalidInstruction {
            line,
            reason: "Register 31 cannot be the destination of a doubleword transfer.".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_signed16() {
        assert!(fits_signed16(0));
        assert!(fits_signed16(32767));
        assert!(fits_signed16(-32768));
        assert!(!fits_signed16(32768));
        assert!(!fits_signed16(-32769));
    }

    #[test]
    fn test_fits_unsigned16() {
        assert!(fits_unsigned16(0));
        assert!(fits_unsigned16(65535));
        assert!(!fits_unsigned16(65536));
        assert!(!fits_unsigned16(-1));
    }

    #[test]
    fn test_check_even_registers() {
        assert!(check_even_registers(&[0, 2, 30], 1).is_ok());
        assert!(check_even_registers(&[0, 3], 1).is_err());
    }

    #[test]
    fn test_check_flag_range() {
        assert!(check_flag_range(0, 1).is_ok());
        assert!(check_flag_range(7, 1).is_ok());
        assert!(check_flag_range(8, 1).is_err());
        assert!(check_flag_range(-1, 1).is_err());
    }

    #[test]
    fn test_check_pair_destination() {
        assert!(check_pair_destination(30, 1).is_ok());
        assert!(check_pair_destination(31, 1).is_err());
    }
}
