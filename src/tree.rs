//! Declarative prefix code tree for VLC lookup table generation.
//!
//! A tree maps bit-string fragments to nested subtrees, literal 16-bit
//! codewords, or (zero-run, magnitude) pairs. Run/magnitude leaves expand
//! into two codes, one per sign, with the magnitude packed through the same
//! 10-bit two's-complement layout the block encoder uses.
//!
//! The built-in default is the MPEG-1 derived AC coefficient table the MDEC
//! understands. It deliberately leaves two index regions unmapped - the
//! 6-bit escape prefix (followed in the stream by a raw 16-bit word) and
//! codes with twelve or more leading zeros - which are declared as
//! *reserved prefixes* so table construction can still verify completeness
//! everywhere else.

use serde_json::Value;

use crate::codeword::to_int10;
use crate::error::Error;
use crate::Result;

/// Longest supported code, including the sign bit. Bounds lookup table
/// allocation.
pub const MAX_CODE_BITS: u8 = 24;

/// A single code: `len` bits stored in the low bits of `bits`,
/// most-significant bit first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Code {
    pub bits: u32,
    pub len: u8,
}

impl Code {
    const EMPTY: Code = Code { bits: 0, len: 0 };

    /// Number of leading zero bits in the code.
    #[must_use]
    pub fn leading_zeros(self) -> u8 {
        for i in 0..self.len {
            if self.bits >> (self.len - 1 - i) & 1 == 1 {
                return i;
            }
        }
        self.len
    }

    fn push_bit(self, bit: u32) -> Code {
        Code {
            bits: (self.bits << 1) | bit,
            len: self.len + 1,
        }
    }

    fn extend(self, fragment: &str) -> Result<Code> {
        if fragment.is_empty() {
            return Err(Error::MalformedTree {
                reason: "empty bit-string fragment".into(),
            });
        }
        let mut code = self;
        for c in fragment.chars() {
            if code.len >= MAX_CODE_BITS {
                return Err(Error::MalformedTree {
                    reason: format!("code exceeds {} bits", MAX_CODE_BITS),
                });
            }
            match c {
                '0' => code = code.push_bit(0),
                '1' => code = code.push_bit(1),
                _ => {
                    return Err(Error::MalformedTree {
                        reason: format!("fragment {:?} contains non-binary character", fragment),
                    })
                }
            }
        }
        Ok(code)
    }
}

/// One node of the declarative code tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Nested subtree: bit-string fragments extending the current prefix
    Branch(Vec<(String, Node)>),
    /// Literal 16-bit output codeword
    Literal(u16),
    /// Run/magnitude pair; one extra trailing bit selects the sign
    Run { length: u8, amplitude: i16 },
}

/// A complete prefix code tree plus its reserved (unmapped) prefixes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTree {
    root: Vec<(String, Node)>,
    reserved: Vec<String>,
}

impl CodeTree {
    /// Create a tree with no reserved prefixes.
    pub fn new(root: Vec<(String, Node)>) -> Self {
        Self {
            root,
            reserved: Vec::new(),
        }
    }

    /// Declare prefixes the code set intentionally leaves unmapped.
    /// Their table slots must stay empty.
    pub fn with_reserved<S: Into<String>>(mut self, prefixes: Vec<S>) -> Self {
        self.reserved = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a tree from its JSON form: an object mapping bit-string keys
    /// to nested objects, integer literals, or `[run, magnitude]` arrays.
    ///
    /// An optional top-level `"reserved"` key holds an array of bit-string
    /// prefixes the code set intentionally leaves unmapped, so a tree with
    /// an escape region can still pass completeness validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| Error::MalformedTree {
            reason: format!("invalid JSON: {}", e),
        })?;
        let Value::Object(map) = &value else {
            return Err(Error::MalformedTree {
                reason: "top-level JSON value must be an object".into(),
            });
        };

        let mut root = Vec::with_capacity(map.len());
        let mut reserved = Vec::new();
        for (key, child) in map {
            if key == "reserved" {
                reserved = parse_reserved(child)?;
            } else {
                root.push((key.clone(), parse_node(key, child)?));
            }
        }
        Ok(Self::new(root).with_reserved(reserved))
    }

    /// Flatten the tree into `(code, packed value)` pairs, expanding
    /// run/magnitude leaves into their two signed codes.
    pub fn codes(&self) -> Result<Vec<(Code, u16)>> {
        let mut out = Vec::new();
        flatten_into(&self.root, Code::EMPTY, &mut out)?;
        Ok(out)
    }

    /// The reserved prefixes as parsed codes.
    pub fn reserved_codes(&self) -> Result<Vec<Code>> {
        self.reserved
            .iter()
            .map(|p| Code::EMPTY.extend(p))
            .collect()
    }
}

impl Default for CodeTree {
    /// The MDEC's MPEG-1 derived AC coefficient table.
    fn default() -> Self {
        Self::new(default_root()).with_reserved(vec![
            // Escape code: followed by a raw 16-bit word, consumed by the
            // decoder ahead of table lookup.
            "000001",
            // Twelve or more leading zeros never occur in a valid stream.
            "000000000000",
        ])
    }
}

fn flatten_into(nodes: &[(String, Node)], prefix: Code, out: &mut Vec<(Code, u16)>) -> Result<()> {
    for (fragment, node) in nodes {
        let code = prefix.extend(fragment)?;
        match node {
            Node::Branch(children) => flatten_into(children, code, out)?,
            Node::Literal(value) => out.push((code, *value)),
            Node::Run { length, amplitude } => {
                if *length > 63 {
                    return Err(Error::MalformedTree {
                        reason: format!("run length {} exceeds the 6-bit field", length),
                    });
                }
                if code.len + 1 > MAX_CODE_BITS {
                    return Err(Error::MalformedTree {
                        reason: format!("code exceeds {} bits", MAX_CODE_BITS),
                    });
                }
                let positive = ((*length as u16) << 10) | to_int10(*amplitude as i32);
                let negative = ((*length as u16) << 10) | to_int10(-(*amplitude as i32));
                out.push((code.push_bit(0), positive));
                out.push((code.push_bit(1), negative));
            }
        }
    }
    Ok(())
}

fn parse_branch(value: &Value) -> Result<Vec<(String, Node)>> {
    let map = value.as_object().ok_or_else(|| Error::MalformedTree {
        reason: "branch node must be a JSON object".into(),
    })?;
    let mut nodes = Vec::with_capacity(map.len());
    for (key, child) in map {
        nodes.push((key.clone(), parse_node(key, child)?));
    }
    Ok(nodes)
}

fn parse_reserved(value: &Value) -> Result<Vec<String>> {
    let items = value.as_array().ok_or_else(|| Error::MalformedTree {
        reason: "\"reserved\" must be an array of bit strings".into(),
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| Error::MalformedTree {
                    reason: "\"reserved\" must be an array of bit strings".into(),
                })
        })
        .collect()
}

fn parse_node(key: &str, value: &Value) -> Result<Node> {
    match value {
        Value::Object(_) => Ok(Node::Branch(parse_branch(value)?)),
        Value::Number(n) => {
            let literal = n.as_u64().filter(|&v| v <= u16::MAX as u64).ok_or_else(|| {
                Error::MalformedTree {
                    reason: format!("literal at {:?} is not a 16-bit unsigned value", key),
                }
            })?;
            Ok(Node::Literal(literal as u16))
        }
        Value::Array(items) => {
            if items.len() != 2 {
                return Err(Error::MalformedTree {
                    reason: format!("pair at {:?} must have exactly two elements", key),
                });
            }
            let length = items[0].as_u64().filter(|&v| v <= 63).ok_or_else(|| {
                Error::MalformedTree {
                    reason: format!("run length at {:?} is not in 0..=63", key),
                }
            })?;
            let amplitude = items[1]
                .as_i64()
                .filter(|v| i16::try_from(*v).is_ok())
                .ok_or_else(|| Error::MalformedTree {
                    reason: format!("magnitude at {:?} is not a 16-bit integer", key),
                })?;
            Ok(Node::Run {
                length: length as u8,
                amplitude: amplitude as i16,
            })
        }
        _ => Err(Error::MalformedTree {
            reason: format!("node at {:?} must be an object, integer, or pair", key),
        }),
    }
}

fn run(length: u8, amplitude: i16) -> Node {
    Node::Run { length, amplitude }
}

fn branch(children: Vec<(&str, Node)>) -> Node {
    Node::Branch(
        children
            .into_iter()
            .map(|(frag, node)| (frag.to_owned(), node))
            .collect(),
    )
}

#[rustfmt::skip]
fn default_root() -> Vec<(String, Node)> {
    let nodes = vec![
        ("10", Node::Literal(0xfe00)), // End of block
        ("11", run(0, 1)),
        ("01", branch(vec![
            ("1",     run(1, 1)),
            ("00",    run(0, 2)),
            ("01",    run(2, 1)),
        ])),
        ("001", branch(vec![
            ("01",    run(0, 3)),
            ("10",    run(4, 1)),
            ("11",    run(3, 1)),
            ("00000", run(13, 1)),
            ("00001", run(0, 6)),
            ("00010", run(12, 1)),
            ("00011", run(11, 1)),
            ("00100", run(3, 2)),
            ("00101", run(1, 3)),
            ("00110", run(0, 5)),
            ("00111", run(10, 1)),
        ])),
        ("0001", branch(vec![
            ("00", run(7, 1)),
            ("01", run(6, 1)),
            ("10", run(1, 2)),
            ("11", run(5, 1)),
        ])),
        ("00001", branch(vec![
            ("00", run(2, 2)),
            ("01", run(9, 1)),
            ("10", run(0, 4)),
            ("11", run(8, 1)),
        ])),
        ("0000001", branch(vec![
            ("000", run(16, 1)),
            ("001", run(5, 2)),
            ("010", run(0, 7)),
            ("011", run(2, 3)),
            ("100", run(1, 4)),
            ("101", run(15, 1)),
            ("110", run(14, 1)),
            ("111", run(4, 2)),
        ])),
        ("00000001", branch(vec![
            ("0000", run(0, 11)),
            ("0001", run(8, 2)),
            ("0010", run(4, 3)),
            ("0011", run(0, 10)),
            ("0100", run(2, 4)),
            ("0101", run(7, 2)),
            ("0110", run(21, 2)),
            ("0111", run(20, 1)),
            ("1000", run(0, 9)),
            ("1001", run(19, 1)),
            ("1010", run(18, 1)),
            ("1011", run(1, 5)),
            ("1100", run(3, 3)),
            ("1101", run(0, 8)),
            ("1110", run(6, 2)),
            ("1111", run(17, 1)),
        ])),
        ("000000001", branch(vec![
            ("0000", run(10, 2)),
            ("0001", run(9, 2)),
            ("0010", run(5, 3)),
            ("0011", run(3, 4)),
            ("0100", run(2, 5)),
            ("0101", run(1, 7)),
            ("0110", run(1, 6)),
            ("0111", run(0, 15)),
            ("1000", run(0, 14)),
            ("1001", run(0, 13)),
            ("1010", run(0, 12)),
            ("1011", run(26, 1)),
            ("1100", run(25, 1)),
            ("1101", run(24, 1)),
            ("1110", run(23, 1)),
            ("1111", run(22, 1)),
        ])),
        ("0000000001", branch(vec![
            ("0000", run(0, 31)),
            ("0001", run(0, 30)),
            ("0010", run(0, 29)),
            ("0011", run(0, 28)),
            ("0100", run(0, 27)),
            ("0101", run(0, 26)),
            ("0110", run(0, 25)),
            ("0111", run(0, 24)),
            ("1000", run(0, 23)),
            ("1001", run(0, 22)),
            ("1010", run(0, 21)),
            ("1011", run(0, 20)),
            ("1100", run(0, 19)),
            ("1101", run(0, 18)),
            ("1110", run(0, 17)),
            ("1111", run(0, 16)),
        ])),
        ("00000000001", branch(vec![
            ("0000", run(0, 40)),
            ("0001", run(0, 39)),
            ("0010", run(0, 38)),
            ("0011", run(0, 37)),
            ("0100", run(0, 36)),
            ("0101", run(0, 35)),
            ("0110", run(0, 34)),
            ("0111", run(0, 33)),
            ("1000", run(0, 32)),
            ("1001", run(1, 14)),
            ("1010", run(1, 13)),
            ("1011", run(1, 12)),
            ("1100", run(1, 11)),
            ("1101", run(1, 10)),
            ("1110", run(1, 9)),
            ("1111", run(1, 8)),
        ])),
        ("000000000001", branch(vec![
            ("0000", run(1, 18)),
            ("0001", run(1, 17)),
            ("0010", run(1, 16)),
            ("0011", run(1, 15)),
            ("0100", run(6, 3)),
            ("0101", run(16, 2)),
            ("0110", run(15, 2)),
            ("0111", run(14, 2)),
            ("1000", run(13, 2)),
            ("1001", run(12, 2)),
            ("1010", run(11, 2)),
            ("1011", run(31, 1)),
            ("1100", run(30, 1)),
            ("1101", run(29, 1)),
            ("1110", run(28, 1)),
            ("1111", run(27, 1)),
        ])),
    ];

    nodes
        .into_iter()
        .map(|(frag, node)| (frag.to_owned(), node))
        .collect()
}
