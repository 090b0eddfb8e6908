pub(crate) mod general_iter;

// reexport all macros at toplevel for convenience
pub(crate) use general_iter::gen_vector_iter_impl;
pub(crate) use general_iter::impl_into_iterator_impls;
pub(crate) use general_iter::impl_vector_iterator;
