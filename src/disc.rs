pub mod basis;
pub mod cubature;
pub mod dfr;
pub mod frozen;
pub mod geometric;
pub mod lagrange_element;
pub mod linalg;
pub mod nodes;
