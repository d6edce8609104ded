use crate::{Error, RecordView};

/// Mid-decode size resolution for a block's dynamic segments.
///
/// `resolve` is invoked once per dynamic segment, in declaration order, and
/// returns the size (in bits) that segment should be decoded at along with
/// whatever accumulator state the next call should see. `Acc` threads
/// sequentially — the value returned from resolving segment `N` is exactly
/// the value passed to resolving segment `N + 1`.
///
/// `Acc` is a parameter of the trait itself, not an associated type: an
/// associated type is only usable in a blanket `impl<F> Resolver for F`
/// when every type it's defined in terms of is otherwise constrained by the
/// impl, and a bare `FnMut(.., Acc) -> ..` closure has `Acc` appearing only
/// in argument position, which doesn't constrain it. Making it a trait
/// generic lets the blanket closure impl below key off `Resolver<A>` itself.
pub trait Resolver<Acc> {
    fn resolve(
        &mut self,
        record: &RecordView<'_>,
        segment_name: &str,
        acc: Acc,
    ) -> Result<(usize, Acc), Error>;
}

/// Any closure of the right shape is a resolver, so a one-off decode doesn't
/// need a named type just to satisfy the trait.
impl<A, F> Resolver<A> for F
where
    F: FnMut(&RecordView<'_>, &str, A) -> Result<(usize, A), Error>,
{
    fn resolve(&mut self, record: &RecordView<'_>, segment_name: &str, acc: A) -> Result<(usize, A), Error> {
        self(record, segment_name, acc)
    }
}
