//! Leaf splitting: turning a single-pair cell into a subtree when a second
//! key arrives below it.

use crate::fan::fork;
use crate::twig::Twig;

/// Splits a leaf whose stored key disagrees with `key`.
///
/// `shift` is the descent cursor at the leaf. An exhausted incoming key
/// reads as the end-of-key sentinel at any alignment, so the stored key's
/// recorded shift takes over in that case; otherwise the cursor and the
/// recorded shift agree whenever the stored key is non-empty.
///
/// The longest common byte run of the two keys becomes a cut-node (when it
/// is non-empty), and below it a chain of width-5 fan-nodes walks to the
/// first divergent nibble, where two ordered leaves part ways.
pub(crate) fn add_to_leaf<V>(leaf: &mut Twig<V>, key: &[u8], shift: usize, val: V) {
    let shift = if key.is_empty() { leaf.shift() } else { shift };
    // with two non-empty keys the cursor and the recorded shift coincide
    debug_assert!(
        key.is_empty() || leaf.leaf_key().as_slice().is_empty() || shift == leaf.shift()
    );
    let (stored_key, stored_val) = leaf.take_leaf();

    let num = common_prefix_len(key, &stored_key);
    let displaced = move |tail: &[u8], tail_shift: usize| Twig::leaf(tail, tail_shift, stored_val);

    *leaf = if num > 0 {
        let chain = fork(0, &key[num..], val, &stored_key[num..], displaced);
        Twig::cut(&key[..num], shift, chain)
    } else {
        fork(shift, key, val, &stored_key[..], displaced)
    };
}

/// Length of the longest common byte prefix of two keys.
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::bits;
    use crate::trie::find_closest;

    enum Shape {
        Fan {
            shift: usize,
            pfx_size: usize,
            nib_size: usize,
            pfx: u64,
            bitmap: u64,
        },
        Cut {
            chunk: &'static str,
        },
    }

    #[test]
    fn add_to_leaf_table() {
        use Shape::*;

        #[rustfmt::skip]
        let cases: &[(&str, usize, &str, &str, Shape)] = &[
            ("1-byte keys, diff-bit:0", 0,
             "01100110",
             "11010110",
             Fan { shift: 0, pfx_size: 0, nib_size: 5, pfx: 0,
                   bitmap: 1 << 0b00110 | 1 << 0b01011 }),
            ("1-byte keys, diff-bit:7", 0,
             "11100011",
             "11100010",
             Fan { shift: 0, pfx_size: 0, nib_size: 5, pfx: 0,
                   bitmap: 1 << 0b00111 }),
            ("1-byte keys, diff-bit:5", 4,
             "1110_0110",
             "1110_0010",
             Fan { shift: 4, pfx_size: 0, nib_size: 5, pfx: 0,
                   bitmap: 1 << 0b00110 | 1 << 0b00100 }),
            ("empty key and 1-byte key", 0,
             "",
             "11010110",
             Fan { shift: 0, pfx_size: 0, nib_size: 5, pfx: 0,
                   bitmap: 1 << 32 | 1 << 0b01011 }),
            ("1-byte key and empty key", 0,
             "11010110",
             "",
             Fan { shift: 0, pfx_size: 0, nib_size: 5, pfx: 0,
                   bitmap: 1 << 32 | 1 << 0b01011 }),
            ("2-byte keys, diff-bit:13", 0,
             "11010110_11100101",
             "11010110_11101101",
             Cut { chunk: "11010110" }),
            ("1-byte key and 2-byte key", 0,
             "11010110",
             "11010110_11101101",
             Cut { chunk: "11010110" }),
            ("2-byte key and 1-byte key", 0,
             "11010110_11101101",
             "11010110",
             Cut { chunk: "11010110" }),
        ];

        for (name, shift, key1, key2, shape) in cases {
            let key1 = bits(key1);
            let key2 = bits(key2);

            let mut twig = Twig::leaf(&key1, *shift, "one");
            assert!(twig.is_leaf(), "{name}: fresh twig must be a leaf");

            add_to_leaf(&mut twig, &key2, *shift, "two");

            match shape {
                Fan {
                    shift,
                    pfx_size,
                    nib_size,
                    pfx,
                    bitmap,
                } => {
                    assert!(twig.is_fan_node(), "{name}");
                    assert_eq!(twig.shift(), *shift, "{name}: shift");
                    assert_eq!(twig.nibble_size(), *nib_size, "{name}: nibble width");
                    assert_eq!(twig.prefix(), (*pfx, *pfx_size), "{name}: prefix");
                    assert_eq!(twig.bitmap().0, *bitmap, "{name}: bitmap");
                }
                Cut { chunk } => {
                    assert!(twig.is_cut_node(), "{name}");
                    assert_eq!(twig.cut_key().as_slice(), &bits(chunk)[..], "{name}: chunk");
                }
            }

            let (found, _, _, exact) = find_closest(&twig, &key1);
            assert!(found.is_leaf() && exact, "{name}: key1 lookup");
            assert_eq!(found.leaf_value(), &"one", "{name}");

            let (found, _, _, exact) = find_closest(&twig, &key2);
            assert!(found.is_leaf() && exact, "{name}: key2 lookup");
            assert_eq!(found.leaf_value(), &"two", "{name}");
        }
    }

    #[test]
    fn common_prefix_len_basics() {
        assert_eq!(common_prefix_len(b"", b""), 0);
        assert_eq!(common_prefix_len(b"abc", b""), 0);
        assert_eq!(common_prefix_len(b"abc", b"abd"), 2);
        assert_eq!(common_prefix_len(b"abc", b"abcdef"), 3);
        assert_eq!(common_prefix_len(b"xyz", b"abc"), 0);
    }
}
