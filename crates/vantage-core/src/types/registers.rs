//! CPU register layouts and snapshots.

use std::collections::{HashMap, HashSet};

/// One named bit inside a flags register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagBit
{
    /// Lower-case flag name (`zf`, `n`, ...)
    pub name: String,
    /// Bit position inside the register value
    pub bit: u32,
}

/// A flags/status register together with its bit breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRegister
{
    /// Register name as the backend knows it (`eflags`, `cpsr`)
    pub name: String,
    /// Annotated bits, in display order
    pub bits: Vec<FlagBit>,
}

impl FlagRegister
{
    pub fn new(name: &str, bits: &[(&str, u32)]) -> Self
    {
        Self {
            name: name.to_string(),
            bits: bits
                .iter()
                .map(|(flag, bit)| FlagBit {
                    name: (*flag).to_string(),
                    bit: *bit,
                })
                .collect(),
        }
    }
}

/// Architecture register groups used to build the default register view.
///
/// A backend describes its register file once; the register section decides
/// which groups to show based on `show-flags` and `show-retaddr-reg`.
///
/// ## Example
///
/// ```rust
/// use vantage_core::types::RegisterLayout;
///
/// let layout = RegisterLayout::x86_64();
/// assert_eq!(layout.pc, "rip");
/// assert!(layout.return_address.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLayout
{
    /// General purpose registers in display order
    pub general: Vec<String>,
    /// Frame/base pointer, if the architecture has a dedicated one
    pub frame: Option<String>,
    /// Stack pointer
    pub stack: String,
    /// Program counter
    pub pc: String,
    /// Registers holding a return address (link register on ARM)
    pub return_address: Vec<String>,
    /// Flag registers with their bit layout
    pub flags: Vec<FlagRegister>,
}

impl RegisterLayout
{
    /// Register layout of x86-64 (System V naming).
    pub fn x86_64() -> Self
    {
        let general = [
            "rax", "rbx", "rcx", "rdx", "rdi", "rsi", "r8", "r9", "r10", "r11", "r12", "r13", "r14", "r15",
        ];
        Self {
            general: general.iter().map(|name| (*name).to_string()).collect(),
            frame: Some("rbp".to_string()),
            stack: "rsp".to_string(),
            pc: "rip".to_string(),
            return_address: Vec::new(),
            flags: vec![FlagRegister::new(
                "eflags",
                &[
                    ("cf", 0),
                    ("pf", 2),
                    ("af", 4),
                    ("zf", 6),
                    ("sf", 7),
                    ("if", 9),
                    ("df", 10),
                    ("of", 11),
                ],
            )],
        }
    }

    /// Register layout of AArch64.
    ///
    /// X29 doubles as the frame pointer and X30 as the link register, so they
    /// are not listed with the general purpose group.
    pub fn arm64() -> Self
    {
        Self {
            general: (0..=28).map(|index| format!("x{index}")).collect(),
            frame: Some("x29".to_string()),
            stack: "sp".to_string(),
            pc: "pc".to_string(),
            return_address: vec!["x30".to_string()],
            flags: vec![FlagRegister::new("cpsr", &[("n", 31), ("z", 30), ("c", 29), ("v", 28)])],
        }
    }
}

/// Register values captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterSnapshot
{
    values: HashMap<String, u64>,
}

impl RegisterSnapshot
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<u64>
    {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize
    {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.values.is_empty()
    }

    /// Names whose value differs from `previous`.
    ///
    /// Registers that `previous` never saw are not reported, so diffing
    /// against an empty snapshot yields an empty set.
    pub fn changed_since(&self, previous: &RegisterSnapshot) -> HashSet<String>
    {
        self.values
            .iter()
            .filter(|(name, value)| previous.get(name).is_some_and(|old| old != **value))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl FromIterator<(String, u64)> for RegisterSnapshot
{
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self
    {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
