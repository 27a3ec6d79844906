mod multi_layer;
mod registry;
