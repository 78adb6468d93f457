//! Cut-nodes: byte-aligned compression of a key fragment shared by every
//! key below it.

use crate::fan::fork;
use crate::leaf::common_prefix_len;
use crate::twig::Twig;

/// Splits a cut-node whose chunk disagrees with `key`.
///
/// `shift` is the descent cursor at this node; an exhausted incoming key
/// falls back to the chunk's recorded alignment, since its own reads are all
/// end-of-key sentinels.
///
/// The shared byte run stays behind a cut-node; below it a chain of width-5
/// fan-nodes walks to the first divergent nibble and parts ways into a leaf
/// for the new pair and a cut-node carrying the old chunk's unmatched suffix
/// in front of the original child. When the bridge consumes the suffix down
/// to a byte boundary, the original child takes the slot directly.
pub(crate) fn add_to_cut_node<V>(node: &mut Twig<V>, key: &[u8], shift: usize, val: V) {
    let shift = if key.is_empty() { node.shift() } else { shift };
    let (chunk, child) = node.take_cut();

    let num = common_prefix_len(key, &chunk);
    // the descent only stops at a cut-node when the chunk is not a prefix of
    // the remaining key, so part of the chunk always survives
    debug_assert!(num < chunk.len());

    let displaced = move |tail: &[u8], tail_shift: usize| {
        if tail.is_empty() {
            // a consumed chunk ends at a byte boundary, where the original
            // child already sits
            child
        } else {
            Twig::cut(tail, tail_shift, child)
        }
    };

    *node = if num > 0 {
        let chain = fork(0, &key[num..], val, &chunk[num..], displaced);
        Twig::cut(&key[..num], shift, chain)
    } else {
        fork(shift, key, val, &chunk[..], displaced)
    };
}
