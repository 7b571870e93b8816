pub(crate) mod image;
pub(crate) mod mesh;
pub(crate) mod text;
