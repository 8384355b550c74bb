pub mod keysym;

pub use keysym::KeysymMap;
