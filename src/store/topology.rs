//! Local side numbering of the supported element families.
//!
//! Each table lists, per 1-based side, the 1-based positions within an element's
//! connectivity of the nodes on that side. Lower order elements use a prefix of the row.

const BAR_SIDES: [&[usize]; 2] = [&[1], &[2]];

const TRI_SIDES: [&[usize]; 3] = [&[1, 2, 4], &[2, 3, 5], &[3, 1, 6]];

const QUAD_SIDES: [&[usize]; 4] = [&[1, 2, 5], &[2, 3, 6], &[3, 4, 7], &[4, 1, 8]];

const TET_SIDES: [&[usize]; 4] = [
    &[1, 2, 4, 5, 9, 8],
    &[2, 3, 4, 6, 10, 9],
    &[1, 4, 3, 8, 10, 7],
    &[1, 3, 2, 7, 6, 5],
];

const HEX_SIDES: [&[usize]; 6] = [
    &[1, 2, 6, 5, 9, 14, 17, 13, 26],
    &[2, 3, 7, 6, 10, 15, 18, 14, 25],
    &[3, 4, 8, 7, 11, 16, 19, 15, 27],
    &[1, 5, 8, 4, 13, 20, 16, 12, 24],
    &[1, 4, 3, 2, 12, 11, 10, 9, 22],
    &[5, 6, 7, 8, 17, 18, 19, 20, 23],
];

/// Side table and nodes per side of an element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Topology {
    sides: &'static [&'static [usize]],
    nodes_per_side: usize,
}

impl Topology {
    /// classify an element type tag such as `"HEX8"` or `"tri"`.
    ///
    /// The family is matched case-insensitively; a missing node count selects the lowest
    /// order element of the family.
    pub(crate) fn of(elem_type: &str) -> Option<Self> {
        let upper = elem_type.trim().to_ascii_uppercase();
        let family = upper.trim_end_matches(|c: char| c.is_ascii_digit());
        let nodes: Option<usize> = upper[family.len()..].parse().ok();

        let (sides, nodes_per_side): (&'static [&'static [usize]], usize) = match family {
            "BAR" | "BEAM" | "TRUSS" | "EDGE" => (&BAR_SIDES, 1),
            "TRI" | "TRIANGLE" => match nodes.unwrap_or(3) {
                3 => (&TRI_SIDES, 2),
                6 | 7 => (&TRI_SIDES, 3),
                _ => return None,
            },
            "QUAD" => match nodes.unwrap_or(4) {
                4 => (&QUAD_SIDES, 2),
                8 | 9 => (&QUAD_SIDES, 3),
                _ => return None,
            },
            "TET" | "TETRA" => match nodes.unwrap_or(4) {
                4 => (&TET_SIDES, 3),
                10 => (&TET_SIDES, 6),
                _ => return None,
            },
            "HEX" => match nodes.unwrap_or(8) {
                8 => (&HEX_SIDES, 4),
                20 => (&HEX_SIDES, 8),
                27 => (&HEX_SIDES, 9),
                _ => return None,
            },
            _ => return None,
        };

        Some(Self {
            sides,
            nodes_per_side,
        })
    }

    pub(crate) fn nodes_per_side(&self) -> usize {
        self.nodes_per_side
    }

    /// 1-based connectivity positions of the nodes on the 1-based `side`
    pub(crate) fn side(&self, side: i32) -> Option<&'static [usize]> {
        let idx = usize::try_from(side).ok()?.checked_sub(1)?;
        self.sides
            .get(idx)
            .map(|nodes| &nodes[..self.nodes_per_side])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_per_side_by_order() {
        let cases = [
            ("BAR2", 1),
            ("TRI3", 2),
            ("TRI6", 3),
            ("QUAD4", 2),
            ("QUAD8", 3),
            ("QUAD9", 3),
            ("TET4", 3),
            ("TET10", 6),
            ("HEX8", 4),
            ("HEX20", 8),
            ("HEX27", 9),
            ("quad", 2),
            ("TETRA", 3),
        ];

        for (elem_type, expected) in cases {
            let topology = Topology::of(elem_type).unwrap();
            assert_eq!(topology.nodes_per_side(), expected, "{elem_type}");
        }
    }

    #[test]
    fn sides_are_one_based() {
        let tet = Topology::of("TET4").unwrap();
        assert_eq!(tet.side(1), Some(&[1, 2, 4][..]));
        assert_eq!(tet.side(4), Some(&[1, 3, 2][..]));
        assert_eq!(tet.side(0), None);
        assert_eq!(tet.side(5), None);

        let hex = Topology::of("HEX27").unwrap();
        assert_eq!(hex.side(6).map(<[usize]>::len), Some(9));
    }

    #[test]
    fn unknown_types() {
        assert!(Topology::of("WEDGE6").is_none());
        assert!(Topology::of("HEX9").is_none());
        assert!(Topology::of("").is_none());
    }
}
