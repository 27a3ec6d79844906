mod linalg;
mod new;
mod shape;
