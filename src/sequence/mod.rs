//! Lazy sequence iterators over a syntax tree.
//!
//! A tree is converted (see [`build`]) into a small arena of iterators that
//! together behave like an odometer: every call to [`Kernel::advance`] on the
//! root moves to the next string of the cross product, rightmost part first.
//!
//! | Variant      | Produces                                             |
//! |--------------|------------------------------------------------------|
//! | `Literal`    | Each of a fixed list of strings                      |
//! | `Stack`      | Concatenation of its parts (cross product)           |
//! | `Option`     | Each branch in turn, skipping repeated text           |
//! | `Repetition` | `k`-fold concatenations of the child, `min..=max`    |
//! | `Reference`  | Whatever the referenced iterator currently holds     |
//!
//! Iterators are allocated children first, so the subtree of an iterator is
//! the contiguous id range `first..=id`. References use this to tell whether
//! the group they alias took part in the current sequence.

mod build;

use std::collections::HashSet;

pub use build::build;

/// Handle to an iterator in a [`Kernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IterId(usize);

#[derive(Debug)]
enum SeqIter {
    Literal {
        values: Vec<String>,
        pos: usize,
    },
    Stack {
        parts: Vec<IterId>,
    },
    Option {
        branches: Vec<IterId>,
        active: usize,
        seen: HashSet<String>,
    },
    Repetition {
        child: IterId,
        min: usize,
        max: usize,
        /// Every string the child produces, collected on reset.
        values: Vec<String>,
        /// Index into `values` for each repeat; `len()` is the current count.
        digits: Vec<usize>,
    },
    Reference {
        target: IterId,
    },
}

#[derive(Debug)]
struct Slot {
    iter: SeqIter,
    /// First id of this iterator's subtree.
    first: usize,
}

/// Arena owning every iterator built for one enumeration.
#[derive(Debug, Default)]
pub struct Kernel {
    slots: Vec<Slot>,
}

impl Kernel {
    /// Id the next pushed iterator will get.
    fn next_id(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, iter: SeqIter, first: usize) -> IterId {
        let id = IterId(self.slots.len());
        self.slots.push(Slot { iter, first });
        id
    }

    pub fn literal(&mut self, values: Vec<String>) -> IterId {
        let first = self.next_id();
        self.push(SeqIter::Literal { values, pos: 0 }, first)
    }

    /// `first` is the id the subtree started at (see [`Kernel::next_id`]).
    fn stack(&mut self, parts: Vec<IterId>, first: usize) -> IterId {
        self.push(SeqIter::Stack { parts }, first)
    }

    fn option(&mut self, branches: Vec<IterId>, first: usize) -> IterId {
        self.push(
            SeqIter::Option {
                branches,
                active: 0,
                seen: HashSet::new(),
            },
            first,
        )
    }

    fn repetition(&mut self, child: IterId, min: usize, max: usize, first: usize) -> IterId {
        self.push(
            SeqIter::Repetition {
                child,
                min,
                max,
                values: Vec::new(),
                digits: Vec::new(),
            },
            first,
        )
    }

    pub fn reference(&mut self, target: IterId) -> IterId {
        let first = self.next_id();
        self.push(SeqIter::Reference { target }, first)
    }

    /// Move `id` to its first value. Returns `false` if it produces nothing.
    pub fn reset(&mut self, id: IterId) -> bool {
        match &mut self.slots[id.0].iter {
            SeqIter::Literal { values, pos } => {
                *pos = 0;
                !values.is_empty()
            }
            SeqIter::Stack { parts } => {
                let parts = parts.clone();
                parts.into_iter().all(|part| self.reset(part))
            }
            SeqIter::Option { seen, .. } => {
                seen.clear();
                self.settle_option(id, 0, true)
            }
            SeqIter::Repetition { child, .. } => {
                let child = *child;
                let mut values = Vec::new();
                if self.reset(child) {
                    loop {
                        values.push(self.render_string(child));
                        if !self.advance(child) {
                            break;
                        }
                    }
                }
                let ok = match &mut self.slots[id.0].iter {
                    SeqIter::Repetition {
                        min,
                        max,
                        values: slot_values,
                        digits,
                        ..
                    } => {
                        let ok = *min <= *max && (!values.is_empty() || *min == 0);
                        *slot_values = values;
                        *digits = vec![0; *min];
                        ok
                    }
                    _ => false,
                };
                if ok {
                    self.seek_repetition(id);
                }
                ok
            }
            SeqIter::Reference { .. } => true,
        }
    }

    /// Move `id` to its next value. Returns `false` once exhausted; the
    /// iterator must be reset before it is used again.
    pub fn advance(&mut self, id: IterId) -> bool {
        match &mut self.slots[id.0].iter {
            SeqIter::Literal { values, pos } => {
                *pos += 1;
                *pos < values.len()
            }
            SeqIter::Stack { parts } => {
                let parts = parts.clone();
                for i in (0..parts.len()).rev() {
                    if self.advance(parts[i]) {
                        // Parts to the right restart against the new prefix.
                        for &part in &parts[i + 1..] {
                            self.reset(part);
                        }
                        return true;
                    }
                }
                false
            }
            SeqIter::Option {
                branches, active, ..
            } => {
                let (branch, index) = (branches[*active], *active);
                if self.advance(branch) {
                    self.settle_option(id, index, false)
                } else {
                    self.settle_option(id, index + 1, true)
                }
            }
            SeqIter::Repetition {
                max, values, digits, ..
            } => {
                let mut carried = true;
                for digit in digits.iter_mut().rev() {
                    *digit += 1;
                    if *digit < values.len() {
                        carried = false;
                        break;
                    }
                    *digit = 0;
                }
                if carried {
                    let count = digits.len() + 1;
                    if count > *max || values.is_empty() {
                        return false;
                    }
                    *digits = vec![0; count];
                }
                self.seek_repetition(id);
                true
            }
            SeqIter::Reference { .. } => false,
        }
    }

    /// Position an option on branch `index` or later, skipping empty branches
    /// and values already produced since the last reset.
    fn settle_option(&mut self, id: IterId, mut index: usize, mut fresh: bool) -> bool {
        loop {
            let branch = match &mut self.slots[id.0].iter {
                SeqIter::Option {
                    branches, active, ..
                } => match branches.get(index) {
                    Some(&branch) => {
                        *active = index;
                        branch
                    }
                    None => return false,
                },
                _ => return false,
            };
            if !fresh || self.reset(branch) {
                let text = self.render_string(branch);
                let unseen = match &mut self.slots[id.0].iter {
                    SeqIter::Option { seen, .. } => seen.insert(text),
                    _ => false,
                };
                if unseen {
                    return true;
                }
                if self.advance(branch) {
                    fresh = false;
                    continue;
                }
            }
            index += 1;
            fresh = true;
        }
    }

    /// Leave the repeated child on the value used by the last repeat, so that
    /// references to groups inside it see the last iteration.
    fn seek_repetition(&mut self, id: IterId) {
        let SeqIter::Repetition { child, digits, .. } = &self.slots[id.0].iter else {
            return;
        };
        let (child, Some(&last)) = (*child, digits.last()) else {
            return;
        };
        self.reset(child);
        for _ in 0..last {
            self.advance(child);
        }
    }

    /// Append the current value of `id` to `out`.
    pub fn render(&self, id: IterId, out: &mut String) {
        match &self.slots[id.0].iter {
            SeqIter::Literal { values, pos } => {
                if let Some(value) = values.get(*pos) {
                    out.push_str(value);
                }
            }
            SeqIter::Stack { parts } => {
                for &part in parts {
                    self.render(part, out);
                }
            }
            SeqIter::Option {
                branches, active, ..
            } => {
                if let Some(&branch) = branches.get(*active) {
                    self.render(branch, out);
                }
            }
            SeqIter::Repetition { values, digits, .. } => {
                for &digit in digits {
                    if let Some(value) = values.get(digit) {
                        out.push_str(value);
                    }
                }
            }
            SeqIter::Reference { target } => {
                if self.participates(*target, id) {
                    self.render(*target, out);
                }
            }
        }
    }

    pub fn render_string(&self, id: IterId) -> String {
        let mut out = String::new();
        self.render(id, &mut out);
        out
    }

    fn contains(&self, ancestor: usize, id: usize) -> bool {
        self.slots[ancestor].first <= id && id <= ancestor
    }

    /// Whether `target` took part in the current sequence as seen from
    /// `from`: no enclosing option has another branch selected and no
    /// enclosing repetition is at zero repeats. Ancestors that also enclose
    /// `from` are being rendered together with it and are skipped.
    fn participates(&self, target: IterId, from: IterId) -> bool {
        (target.0 + 1..self.slots.len())
            .filter(|&p| self.contains(p, target.0) && !self.contains(p, from.0))
            .all(|p| match &self.slots[p].iter {
                SeqIter::Option {
                    branches, active, ..
                } => branches
                    .get(*active)
                    .is_some_and(|b| self.contains(b.0, target.0)),
                SeqIter::Repetition { digits, .. } => !digits.is_empty(),
                _ => true,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Fresh,
    Running,
    Done,
}

/// The strings an iterator tree produces, in generation order.
///
/// Values are produced one at a time; nothing beyond the repeated children of
/// bounded repetitions is materialized.
#[derive(Debug)]
pub struct Sequences {
    kernel: Kernel,
    root: IterId,
    cursor: Cursor,
}

impl Sequences {
    pub fn new(kernel: Kernel, root: IterId) -> Self {
        Self {
            kernel,
            root,
            cursor: Cursor::Fresh,
        }
    }

    /// Start over from the first value.
    pub fn restart(&mut self) {
        self.cursor = Cursor::Fresh;
    }
}

impl Iterator for Sequences {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let more = match self.cursor {
            Cursor::Fresh => self.kernel.reset(self.root),
            Cursor::Running => self.kernel.advance(self.root),
            Cursor::Done => false,
        };
        if !more {
            self.cursor = Cursor::Done;
            return None;
        }
        self.cursor = Cursor::Running;
        Some(self.kernel.render_string(self.root))
    }
}
