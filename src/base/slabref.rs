use slab::Slab;

use super::INullableValue;

/// A copyable handle addressing one object inside a `Slab` arena.
/// `usize::MAX` is reserved as the null handle.
pub trait SlabRef: Copy + Eq + INullableValue + std::fmt::Debug {
    type RefObject: Sized;

    fn from_handle(handle: usize) -> Self;
    fn get_handle(&self) -> usize;

    fn as_data<'a>(&self, slab: &'a Slab<Self::RefObject>) -> Option<&'a Self::RefObject> {
        slab.get(self.get_handle())
    }
    fn as_data_mut<'a>(
        &self,
        slab: &'a mut Slab<Self::RefObject>,
    ) -> Option<&'a mut Self::RefObject> {
        slab.get_mut(self.get_handle())
    }
    fn to_data<'a>(&self, slab: &'a Slab<Self::RefObject>) -> &'a Self::RefObject {
        self.as_data(slab)
            .unwrap_or_else(|| panic!("stale reference {} (use after free?)", self.get_handle()))
    }
    fn to_data_mut<'a>(&self, slab: &'a mut Slab<Self::RefObject>) -> &'a mut Self::RefObject {
        let handle = self.get_handle();
        slab.get_mut(handle)
            .unwrap_or_else(|| panic!("stale reference {handle} (use after free?)"))
    }
}

impl<T: SlabRef> INullableValue for T {
    fn new_null() -> Self {
        Self::from_handle(usize::MAX)
    }
    fn is_null(&self) -> bool {
        self.get_handle() == usize::MAX
    }
}

#[macro_export]
macro_rules! impl_slabref {
    ($ref_typename:ident, $data_typename:ident) => {
        impl $crate::base::SlabRef for $ref_typename {
            type RefObject = $data_typename;

            fn from_handle(handle: usize) -> Self {
                Self(handle)
            }
            fn get_handle(&self) -> usize {
                self.0
            }
        }
    };
}
