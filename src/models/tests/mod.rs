mod transformer;
